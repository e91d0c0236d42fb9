use anyhow::Context;

use crate::cli::console::is_affirmative;
use crate::services::SearchService;

pub async fn cmd_purge(service: &SearchService, older_than_days: u32, yes: bool) -> anyhow::Result<()> {
    if !yes {
        println!("Delete all search log entries older than {older_than_days} days?");
        println!("Enter 'y' to confirm, anything else to cancel:");

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;

        if !is_affirmative(&input) {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let deleted = service
        .purge_older_than(older_than_days)
        .await
        .context("Failed to purge search log")?;

    println!("✓ Removed {deleted} log entries");
    Ok(())
}
