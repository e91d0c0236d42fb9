use anyhow::Context;

use super::{print_json, print_lines};
use crate::cli::render;
use crate::services::SearchService;

pub async fn cmd_stats(service: &SearchService, json: bool) -> anyhow::Result<()> {
    let stats = service
        .collection_stats()
        .await
        .context("Failed to count search log entries")?;

    if json {
        return print_json(&stats);
    }

    print_lines(render::collection_stats(&stats));
    Ok(())
}
