//! Search orchestration over the catalog and the search log.
//!
//! [`SearchService`] validates input, pages through the catalog and records
//! each logical search exactly once, right after its first page is fetched.
//! Rendering and the continuation prompt are delegated to a [`SearchConsole`].

use crate::models::{
    GenreRecord, LogCollectionStats, MovieDetails, MovieRecord, PopularSearchSummary,
    RecentSearchSummary, SearchEvent, SearchKind, SearchParams, YearRange,
};
use crate::services::catalog_store::{CatalogError, CatalogStore};
use crate::services::log_store::{LogError, LogStore};
use crate::services::validation::{self, ValidationError};
use crate::constants::limits;
use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Output side of an interactive search.
pub trait SearchConsole {
    /// Renders one page; `offset` is the position of the first row.
    fn show_page(&mut self, params: &SearchParams, offset: u64, movies: &[MovieRecord]);

    fn show_no_results(&mut self, params: &SearchParams);

    /// Called when the catalog has no further rows.
    fn show_end_of_results(&mut self);

    /// Asked only after a full page. `true` fetches the next one.
    fn confirm_next_page(&mut self, page_size: u64) -> bool;

    /// A later page failed; the rows already shown stand.
    fn show_interrupted(&mut self, error: &CatalogError);
}

/// What happened during one logical search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub params: SearchParams,
    /// Rows returned by the first page, as recorded in the log.
    pub first_page_count: u64,
    pub rows_shown: u64,
    pub pages_shown: u64,
    /// `None` when the log write failed.
    pub event_id: Option<String>,
    pub interrupted: Option<CatalogError>,
}

impl SearchOutcome {
    #[must_use]
    pub const fn was_logged(&self) -> bool {
        self.event_id.is_some()
    }

    #[must_use]
    pub const fn was_interrupted(&self) -> bool {
        self.interrupted.is_some()
    }
}

/// Genres and year bounds offered to the user before a genre/year search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreSearchContext {
    pub genres: Vec<GenreRecord>,
    pub years: YearRange,
}

/// Connectivity of both stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthReport {
    pub catalog: Result<(), CatalogError>,
    pub log: Result<(), LogError>,
}

impl HealthReport {
    #[must_use]
    pub const fn is_healthy(&self) -> bool {
        self.catalog.is_ok() && self.log.is_ok()
    }
}

pub struct SearchService {
    catalog: Arc<dyn CatalogStore>,
    log: Arc<dyn LogStore>,
    page_size: u64,
    min_keyword_len: usize,
}

impl SearchService {
    #[must_use]
    pub fn new(catalog: Arc<dyn CatalogStore>, log: Arc<dyn LogStore>) -> Self {
        Self {
            catalog,
            log,
            page_size: limits::PAGE_SIZE,
            min_keyword_len: limits::MIN_KEYWORD_LEN,
        }
    }

    /// Overrides the page size (clamped to at least one row) and the minimum keyword length.
    #[must_use]
    pub fn with_limits(mut self, page_size: u64, min_keyword_len: usize) -> Self {
        self.page_size = page_size.max(1);
        self.min_keyword_len = min_keyword_len;
        self
    }

    #[must_use]
    pub const fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Validates raw keyword input. Touches no store.
    pub fn prepare_keyword(&self, raw: &str) -> Result<SearchParams, SearchError> {
        let keyword = validation::validate_keyword(raw, self.min_keyword_len)?;
        Ok(SearchParams::Keyword { keyword })
    }

    /// Validates raw genre/year input against the genres the catalog offers.
    pub fn prepare_genre_year(
        &self,
        genre: &str,
        year_from: &str,
        year_to: &str,
        genres: &[GenreRecord],
    ) -> Result<SearchParams, SearchError> {
        let genre = validation::validate_genre(genre, genres)?;
        let (year_from, year_to) = validation::validate_year_range(year_from, year_to)?;
        Ok(SearchParams::GenreYear {
            genre,
            year_from,
            year_to,
        })
    }

    pub async fn genre_search_context(&self) -> Result<GenreSearchContext, SearchError> {
        let genres = self.catalog.list_genres().await?;
        let years = self.catalog.year_range().await?;
        Ok(GenreSearchContext { genres, years })
    }

    /// Runs one logical search to completion.
    ///
    /// The first page is fetched, logged once with its row count, then
    /// rendered. Further pages are offered only after a full page.
    ///
    /// # Errors
    ///
    /// - Returns [`SearchError::Catalog`] if the first page cannot be fetched;
    ///   nothing is logged in that case
    ///
    /// Failures on later pages and log write failures do not error; they are
    /// reported on the returned [`SearchOutcome`].
    pub async fn run<C>(
        &self,
        params: SearchParams,
        console: &mut C,
    ) -> Result<SearchOutcome, SearchError>
    where
        C: SearchConsole + ?Sized,
    {
        let mut page = self.fetch_page(&params, 0).await?;
        let first_page_count = page.len() as u64;
        let event_id = self.record(&params, first_page_count).await;

        let mut outcome = SearchOutcome {
            params,
            first_page_count,
            rows_shown: 0,
            pages_shown: 0,
            event_id,
            interrupted: None,
        };

        if page.is_empty() {
            console.show_no_results(&outcome.params);
            return Ok(outcome);
        }

        let mut offset = 0;
        loop {
            console.show_page(&outcome.params, offset, &page);
            outcome.rows_shown += page.len() as u64;
            outcome.pages_shown += 1;

            if (page.len() as u64) < self.page_size {
                console.show_end_of_results();
                break;
            }
            if !console.confirm_next_page(self.page_size) {
                break;
            }

            offset += self.page_size;
            match self.fetch_page(&outcome.params, offset).await {
                Ok(next) if next.is_empty() => {
                    console.show_end_of_results();
                    break;
                }
                Ok(next) => page = next,
                Err(err) => {
                    warn!(error = %err, offset, "Search interrupted while paging");
                    console.show_interrupted(&err);
                    outcome.interrupted = Some(err);
                    break;
                }
            }
        }

        info!(
            search = %outcome.params,
            rows = outcome.rows_shown,
            pages = outcome.pages_shown,
            "Search finished"
        );

        Ok(outcome)
    }

    async fn fetch_page(
        &self,
        params: &SearchParams,
        offset: u64,
    ) -> Result<Vec<MovieRecord>, CatalogError> {
        debug!(search = %params, offset, limit = self.page_size, "Fetching page");
        match params {
            SearchParams::Keyword { keyword } => {
                self.catalog
                    .search_by_keyword(keyword, offset, self.page_size)
                    .await
            }
            SearchParams::GenreYear {
                genre,
                year_from,
                year_to,
            } => {
                self.catalog
                    .search_by_genre_and_year(genre, *year_from, *year_to, offset, self.page_size)
                    .await
            }
        }
    }

    async fn record(&self, params: &SearchParams, results_count: u64) -> Option<String> {
        match self.log.record_search(params, results_count).await {
            Ok(id) => Some(id),
            Err(err) => {
                warn!(error = %err, search = %params, "Failed to record search");
                None
            }
        }
    }

    pub async fn movie_details(&self, id: i32) -> Result<Option<MovieDetails>, CatalogError> {
        self.catalog.movie_details(id).await
    }

    pub async fn popular_searches(
        &self,
        limit: usize,
    ) -> Result<Vec<PopularSearchSummary>, LogError> {
        self.log.popular_searches(limit).await
    }

    pub async fn recent_searches(
        &self,
        limit: usize,
    ) -> Result<Vec<RecentSearchSummary>, LogError> {
        self.log.recent_searches(limit).await
    }

    pub async fn collection_stats(&self) -> Result<LogCollectionStats, LogError> {
        Ok(LogCollectionStats {
            total: self.log.count_total().await?,
            keyword: self.log.count_by_kind(SearchKind::Keyword).await?,
            genre_year: self.log.count_by_kind(SearchKind::GenreYear).await?,
            empty_results: self.log.count_empty_results().await?,
        })
    }

    pub async fn history_by_date(&self, date: NaiveDate) -> Result<Vec<SearchEvent>, LogError> {
        self.log.events_by_date(date).await
    }

    pub async fn history_by_kind(
        &self,
        kind: SearchKind,
        limit: usize,
    ) -> Result<Vec<SearchEvent>, LogError> {
        self.log.events_by_kind(kind, limit).await
    }

    /// Deletes log events older than `days` days and returns how many went.
    pub async fn purge_older_than(&self, days: u32) -> Result<u64, LogError> {
        let cutoff = purge_cutoff(Utc::now(), days);
        let deleted = self.log.purge_before(cutoff).await?;
        info!(%cutoff, deleted, "Purged search log");
        Ok(deleted)
    }

    pub async fn health(&self) -> HealthReport {
        HealthReport {
            catalog: self.catalog.ping().await,
            log: self.log.ping().await,
        }
    }
}

/// `now` minus `days`, clamped to the earliest representable instant.
#[must_use]
pub fn purge_cutoff(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    TimeDelta::try_days(i64::from(days))
        .and_then(|age| now.checked_sub_signed(age))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
