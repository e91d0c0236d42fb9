use crate::services::SearchService;

/// Pings both stores. Fails when either is unreachable.
pub async fn cmd_check(service: &SearchService) -> anyhow::Result<()> {
    let report = service.health().await;

    match &report.catalog {
        Ok(()) => println!("✓ Catalog database reachable"),
        Err(e) => println!("✗ {e}"),
    }
    match &report.log {
        Ok(()) => println!("✓ Search log reachable"),
        Err(e) => println!("✗ {e}"),
    }

    if !report.is_healthy() {
        anyhow::bail!("One or more stores are unreachable");
    }
    Ok(())
}
