//! In-process versions of the popularity and recency aggregations.
//!
//! The document store computes these with pipelines; the functions here give
//! the same answers over a slice of events and back the in-memory store.

use crate::models::{PopularSearchSummary, RecentSearchSummary, SearchEvent};
use std::cmp::Reverse;
use std::collections::HashMap;

pub fn popular_searches(events: &[SearchEvent], limit: usize) -> Vec<PopularSearchSummary> {
    let mut chronological: Vec<&SearchEvent> = events
        .iter()
        .filter(|e| !e.search_text.is_empty())
        .collect();
    chronological.sort_by_key(|e| e.timestamp);

    let mut groups: HashMap<&str, PopularSearchSummary> = HashMap::new();
    for event in chronological {
        groups
            .entry(event.search_text.as_str())
            .and_modify(|summary| {
                summary.count += 1;
                summary.total_results += event.results_count;
                summary.last_search = summary.last_search.max(event.timestamp);
            })
            .or_insert_with(|| PopularSearchSummary {
                search_text: event.search_text.clone(),
                count: 1,
                last_search: event.timestamp,
                total_results: event.results_count,
                kind: event.kind,
            });
    }

    let mut summaries: Vec<PopularSearchSummary> =
        groups.into_values().filter(|s| s.count > 0).collect();
    summaries.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| b.last_search.cmp(&a.last_search))
            .then_with(|| a.search_text.cmp(&b.search_text))
    });
    summaries.truncate(limit);
    summaries
}

pub fn recent_searches(events: &[SearchEvent], limit: usize) -> Vec<RecentSearchSummary> {
    let mut newest_first: Vec<&SearchEvent> = events
        .iter()
        .filter(|e| !e.search_text.is_empty())
        .collect();
    newest_first.sort_by_key(|e| Reverse(e.timestamp));

    let mut latest: HashMap<&str, &SearchEvent> = HashMap::new();
    for event in newest_first {
        latest.entry(event.search_text.as_str()).or_insert(event);
    }

    let mut summaries: Vec<RecentSearchSummary> = latest
        .into_values()
        .map(|event| RecentSearchSummary {
            search_text: event.search_text.clone(),
            timestamp: event.timestamp,
            kind: event.kind,
            params: event.params.clone(),
            results_count: event.results_count,
        })
        .collect();
    summaries.sort_by(|a, b| {
        b.timestamp
            .cmp(&a.timestamp)
            .then_with(|| a.search_text.cmp(&b.search_text))
    });
    summaries.truncate(limit);
    summaries
}
