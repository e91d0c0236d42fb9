use anyhow::Context;
use serde_json::json;

use super::{print_json, print_lines};
use crate::cli::render;
use crate::services::SearchService;

pub async fn cmd_genres(service: &SearchService, json: bool) -> anyhow::Result<()> {
    let context = service
        .genre_search_context()
        .await
        .context("Failed to load genres")?;

    if json {
        return print_json(&json!({
            "genres": context.genres,
            "years": context.years,
        }));
    }

    println!("Genres ({} total)", context.genres.len());
    println!("{:-<70}", "");
    print_lines(render::genre_list(&context.genres));
    println!();
    println!("{}", render::year_range(context.years));

    Ok(())
}
