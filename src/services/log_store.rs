//! Append-only search log and the analytics computed over it.
//!
//! This module provides the [`LogStore`] trait. Failures here never abort a
//! search; callers report them and carry on.

use crate::models::{PopularSearchSummary, RecentSearchSummary, SearchEvent, SearchKind, SearchParams};
use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

/// Any connectivity, write or aggregation failure against the log store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LogError {
    #[error("Log store unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed log record: {0}")]
    Malformed(String),
}

impl From<mongodb::error::Error> for LogError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::Unavailable(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait LogStore: Send + Sync {
    /// Appends one search event and returns its id.
    ///
    /// The normalized search text is derived from `params`, so identical
    /// searches aggregate together. Zero-result searches are recorded too.
    ///
    /// # Errors
    ///
    /// - Returns [`LogError::Unavailable`] if the write fails
    async fn record_search(
        &self,
        params: &SearchParams,
        results_count: u64,
    ) -> Result<String, LogError>;

    /// Most repeated search texts: count descending, then most recent first.
    async fn popular_searches(&self, limit: usize)
    -> Result<Vec<PopularSearchSummary>, LogError>;

    /// Latest occurrence of each distinct search text, newest first.
    async fn recent_searches(&self, limit: usize) -> Result<Vec<RecentSearchSummary>, LogError>;

    async fn count_total(&self) -> Result<u64, LogError>;

    /// Events whose search returned no rows.
    async fn count_empty_results(&self) -> Result<u64, LogError>;

    async fn count_by_kind(&self, kind: SearchKind) -> Result<u64, LogError>;

    /// Events logged on `date`, newest first.
    async fn events_by_date(&self, date: NaiveDate) -> Result<Vec<SearchEvent>, LogError>;

    /// Events of one kind, newest first, at most `limit`.
    async fn events_by_kind(
        &self,
        kind: SearchKind,
        limit: usize,
    ) -> Result<Vec<SearchEvent>, LogError>;

    /// Deletes events older than `cutoff` and returns how many were removed.
    async fn purge_before(&self, cutoff: DateTime<Utc>) -> Result<u64, LogError>;

    async fn ping(&self) -> Result<(), LogError>;
}
