//! Popularity and recency views over the search log.

use anyhow::Context;

use super::{print_json, print_lines};
use crate::cli::render;
use crate::services::SearchService;

pub async fn cmd_popular(service: &SearchService, limit: usize, json: bool) -> anyhow::Result<()> {
    let searches = service
        .popular_searches(limit)
        .await
        .context("Failed to load popular searches")?;

    if json {
        return print_json(&searches);
    }

    print_lines(render::popular_searches(&searches));
    Ok(())
}

pub async fn cmd_recent(service: &SearchService, limit: usize, json: bool) -> anyhow::Result<()> {
    let searches = service
        .recent_searches(limit)
        .await
        .context("Failed to load recent searches")?;

    if json {
        return print_json(&searches);
    }

    print_lines(render::recent_searches(&searches));
    Ok(())
}
