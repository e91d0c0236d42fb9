use anyhow::Context;
use chrono::{NaiveDate, Utc};

use super::{print_json, print_lines};
use crate::cli::render;
use crate::models::SearchKind;
use crate::services::SearchService;

/// Lists raw log entries for one day or one search kind.
///
/// Without a filter, today's (UTC) entries are shown.
pub async fn cmd_history(
    service: &SearchService,
    date: Option<NaiveDate>,
    kind: Option<SearchKind>,
    limit: usize,
    json: bool,
) -> anyhow::Result<()> {
    let (title, mut events) = if let Some(kind) = kind {
        let events = service
            .history_by_kind(kind, limit)
            .await
            .with_context(|| format!("Failed to load {kind} searches"))?;
        (format!("Searches of type {kind}"), events)
    } else {
        let date = date.unwrap_or_else(|| Utc::now().date_naive());
        let events = service
            .history_by_date(date)
            .await
            .with_context(|| format!("Failed to load searches for {date}"))?;
        (format!("Searches on {date}"), events)
    };
    events.truncate(limit);

    if json {
        return print_json(&events);
    }

    println!("{title} ({} shown)", events.len());
    println!("{:-<70}", "");
    print_lines(render::history(&events));

    Ok(())
}
