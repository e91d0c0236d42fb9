use anyhow::Context;

use super::{print_json, print_lines};
use crate::cli::render;
use crate::services::SearchService;

pub async fn cmd_details(service: &SearchService, id: i32, json: bool) -> anyhow::Result<()> {
    let Some(details) = service
        .movie_details(id)
        .await
        .with_context(|| format!("Failed to load movie {id}"))?
    else {
        println!("Movie with ID {id} not found.");
        return Ok(());
    };

    if json {
        return print_json(&details);
    }

    print_lines(render::movie_details(&details));
    Ok(())
}
