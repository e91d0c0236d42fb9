//! In-memory implementations of the store traits.
//!
//! Used to drive the search flows without live databases. Both stores can be
//! switched into a failing mode to exercise the error paths.

use crate::models::{
    GenreRecord, MovieDetails, MovieRecord, PopularSearchSummary, RecentSearchSummary,
    SearchEvent, SearchKind, SearchParams, YearRange,
};
use crate::services::catalog_store::{CatalogError, CatalogStore};
use crate::services::log_store::{LogError, LogStore};
use crate::services::stats;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Mutex;

#[derive(Default)]
pub struct InMemoryCatalogStore {
    films: Vec<MovieRecord>,
    genres: Vec<GenreRecord>,
    film_genres: Vec<(i32, i32)>,
    actor_counts: HashMap<i32, i64>,
    unavailable: AtomicBool,
    search_calls: AtomicUsize,
    fail_searches_after: Mutex<Option<usize>>,
}

impl InMemoryCatalogStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_genre(mut self, id: i32, name: &str) -> Self {
        self.genres.push(GenreRecord {
            id,
            name: name.to_string(),
        });
        self
    }

    /// Adds a film tagged with the named genres. Unknown genre names are ignored.
    #[must_use]
    pub fn with_film(mut self, film: MovieRecord, genres: &[&str]) -> Self {
        for name in genres {
            if let Some(genre) = self.genres.iter().find(|g| g.name == *name) {
                self.film_genres.push((film.id, genre.id));
            }
        }
        self.films.push(film);
        self
    }

    #[must_use]
    pub fn with_actor_count(mut self, film_id: i32, count: i64) -> Self {
        self.actor_counts.insert(film_id, count);
        self
    }

    /// Makes every call fail until switched back.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Lets the next `calls` page fetches succeed and fails every one after.
    pub async fn fail_searches_after(&self, calls: usize) {
        self.search_calls.store(0, Ordering::SeqCst);
        *self.fail_searches_after.lock().await = Some(calls);
    }

    /// Number of page fetches issued so far.
    #[must_use]
    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<(), CatalogError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(CatalogError::Unavailable(
                "in-memory catalog switched off".to_string(),
            ));
        }
        Ok(())
    }

    async fn begin_search(&self) -> Result<(), CatalogError> {
        self.check_available()?;
        let call = self.search_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(limit) = *self.fail_searches_after.lock().await {
            if call >= limit {
                return Err(CatalogError::Unavailable(format!(
                    "in-memory catalog failed page fetch #{}",
                    call + 1
                )));
            }
        }
        Ok(())
    }

    fn genre_names_of(&self, film_id: i32) -> Vec<String> {
        let mut names: Vec<String> = self
            .film_genres
            .iter()
            .filter(|(f, _)| *f == film_id)
            .filter_map(|(_, g)| self.genres.iter().find(|genre| genre.id == *g))
            .map(|genre| genre.name.clone())
            .collect();
        names.sort();
        names
    }
}

fn page<T>(items: Vec<T>, offset: u64, limit: u64) -> Vec<T> {
    let offset = usize::try_from(offset).unwrap_or(usize::MAX);
    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    items.into_iter().skip(offset).take(limit).collect()
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn search_by_keyword(
        &self,
        keyword: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<MovieRecord>, CatalogError> {
        self.begin_search().await?;

        let mut matches: Vec<MovieRecord> = self
            .films
            .iter()
            .filter(|f| f.matches_keyword(keyword))
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));

        Ok(page(matches, offset, limit))
    }

    async fn search_by_genre_and_year(
        &self,
        genre: &str,
        year_from: i32,
        year_to: i32,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<MovieRecord>, CatalogError> {
        self.begin_search().await?;

        let Some(genre_id) = self.genres.iter().find(|g| g.name == genre).map(|g| g.id) else {
            return Ok(Vec::new());
        };

        let mut matches: Vec<MovieRecord> = self
            .films
            .iter()
            .filter(|f| self.film_genres.contains(&(f.id, genre_id)))
            .filter(|f| {
                f.release_year
                    .is_some_and(|y| (year_from..=year_to).contains(&y))
            })
            .map(|f| MovieRecord {
                genre: Some(genre.to_string()),
                ..f.clone()
            })
            .collect();
        matches.sort_by(|a, b| {
            b.release_year
                .cmp(&a.release_year)
                .then_with(|| a.title.cmp(&b.title))
                .then(a.id.cmp(&b.id))
        });

        Ok(page(matches, offset, limit))
    }

    async fn list_genres(&self) -> Result<Vec<GenreRecord>, CatalogError> {
        self.check_available()?;
        let mut genres = self.genres.clone();
        genres.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(genres)
    }

    async fn year_range(&self) -> Result<YearRange, CatalogError> {
        self.check_available()?;
        let years = self.films.iter().filter_map(|f| f.release_year);
        Ok(YearRange::from_bounds(years.clone().min(), years.max()))
    }

    async fn movie_details(&self, id: i32) -> Result<Option<MovieDetails>, CatalogError> {
        self.check_available()?;
        Ok(self
            .films
            .iter()
            .find(|f| f.id == id)
            .map(|movie| MovieDetails {
                movie: movie.clone(),
                genres: self.genre_names_of(id),
                actor_count: self.actor_counts.get(&id).copied().unwrap_or(0),
            }))
    }

    async fn ping(&self) -> Result<(), CatalogError> {
        self.check_available()
    }
}

#[derive(Default)]
pub struct InMemoryLogStore {
    events: Mutex<Vec<SearchEvent>>,
    record_calls: AtomicUsize,
    unavailable: AtomicBool,
}

impl InMemoryLogStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an event as if it had been recorded earlier.
    pub async fn push_event(&self, event: SearchEvent) {
        self.events.lock().await.push(event);
    }

    pub async fn events(&self) -> Vec<SearchEvent> {
        self.events.lock().await.clone()
    }

    /// Number of `record_search` calls, including failed ones.
    #[must_use]
    pub fn record_calls(&self) -> usize {
        self.record_calls.load(Ordering::SeqCst)
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), LogError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(LogError::Unavailable(
                "in-memory log store switched off".to_string(),
            ));
        }
        Ok(())
    }

    async fn count_where<F>(&self, predicate: F) -> Result<u64, LogError>
    where
        F: Fn(&SearchEvent) -> bool + Send,
    {
        self.check_available()?;
        let events = self.events.lock().await;
        Ok(events.iter().filter(|&e| predicate(e)).count() as u64)
    }
}

#[async_trait]
impl LogStore for InMemoryLogStore {
    async fn record_search(
        &self,
        params: &SearchParams,
        results_count: u64,
    ) -> Result<String, LogError> {
        self.record_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let results_count = i64::try_from(results_count).unwrap_or(i64::MAX);
        let mut event = SearchEvent::new(params.clone(), results_count, Utc::now());
        let id = uuid::Uuid::new_v4().to_string();
        event.id = Some(id.clone());

        self.events.lock().await.push(event);
        Ok(id)
    }

    async fn popular_searches(
        &self,
        limit: usize,
    ) -> Result<Vec<PopularSearchSummary>, LogError> {
        self.check_available()?;
        Ok(stats::popular_searches(&self.events.lock().await, limit))
    }

    async fn recent_searches(&self, limit: usize) -> Result<Vec<RecentSearchSummary>, LogError> {
        self.check_available()?;
        Ok(stats::recent_searches(&self.events.lock().await, limit))
    }

    async fn count_total(&self) -> Result<u64, LogError> {
        self.count_where(|_| true).await
    }

    async fn count_empty_results(&self) -> Result<u64, LogError> {
        self.count_where(|e| e.results_count == 0).await
    }

    async fn count_by_kind(&self, kind: SearchKind) -> Result<u64, LogError> {
        self.count_where(move |e| e.kind == kind).await
    }

    async fn events_by_date(&self, date: NaiveDate) -> Result<Vec<SearchEvent>, LogError> {
        self.check_available()?;
        let mut events: Vec<SearchEvent> = self
            .events
            .lock()
            .await
            .iter()
            .filter(|e| e.timestamp.date_naive() == date)
            .cloned()
            .collect();
        events.sort_by_key(|e| Reverse(e.timestamp));
        Ok(events)
    }

    async fn events_by_kind(
        &self,
        kind: SearchKind,
        limit: usize,
    ) -> Result<Vec<SearchEvent>, LogError> {
        self.check_available()?;
        let mut events: Vec<SearchEvent> = self
            .events
            .lock()
            .await
            .iter()
            .filter(|e| e.kind == kind)
            .cloned()
            .collect();
        events.sort_by_key(|e| Reverse(e.timestamp));
        events.truncate(limit);
        Ok(events)
    }

    async fn purge_before(&self, cutoff: DateTime<Utc>) -> Result<u64, LogError> {
        self.check_available()?;
        let mut events = self.events.lock().await;
        let before = events.len();
        events.retain(|e| e.timestamp >= cutoff);
        Ok((before - events.len()) as u64)
    }

    async fn ping(&self) -> Result<(), LogError> {
        self.check_available()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn film(id: i32, title: &str, year: i32) -> MovieRecord {
        MovieRecord {
            id,
            title: title.to_string(),
            release_year: Some(year),
            description: Some(format!("A story about {}", title.to_lowercase())),
            rating: Some("PG".to_string()),
            length_minutes: Some(100),
            genre: None,
        }
    }

    #[tokio::test]
    async fn genre_search_orders_newest_first_and_labels_rows() {
        let catalog = InMemoryCatalogStore::new()
            .with_genre(1, "Action")
            .with_genre(2, "Drama")
            .with_film(film(1, "BETA", 2001), &["Action"])
            .with_film(film(2, "ALPHA", 2001), &["Action"])
            .with_film(film(3, "GAMMA", 2005), &["Action", "Drama"])
            .with_film(film(4, "DELTA", 1990), &["Action"]);

        let rows = catalog
            .search_by_genre_and_year("Action", 2000, 2010, 0, 10)
            .await
            .unwrap();
        let titles: Vec<&str> = rows.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, ["GAMMA", "ALPHA", "BETA"]);
        assert!(rows.iter().all(|m| m.genre.as_deref() == Some("Action")));
    }

    #[tokio::test]
    async fn details_collect_sorted_genres() {
        let catalog = InMemoryCatalogStore::new()
            .with_genre(1, "Drama")
            .with_genre(2, "Action")
            .with_film(film(7, "OMEGA", 2006), &["Drama", "Action"])
            .with_actor_count(7, 4);

        let details = catalog.movie_details(7).await.unwrap().unwrap();
        assert_eq!(details.genres, ["Action", "Drama"]);
        assert_eq!(details.actor_count, 4);
        assert!(catalog.movie_details(8).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn fail_searches_after_counts_page_fetches() {
        let catalog = InMemoryCatalogStore::new().with_film(film(1, "ONE", 2006), &[]);
        catalog.fail_searches_after(1).await;

        assert!(catalog.search_by_keyword("one", 0, 10).await.is_ok());
        assert!(matches!(
            catalog.search_by_keyword("one", 10, 10).await,
            Err(CatalogError::Unavailable(_))
        ));
        assert_eq!(catalog.search_calls(), 2);
    }

    #[tokio::test]
    async fn purge_removes_only_older_events() {
        let log = InMemoryLogStore::new();
        let now = Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap();
        for days in [1, 10, 40] {
            log.push_event(SearchEvent::new(
                SearchParams::Keyword {
                    keyword: format!("q{days}"),
                },
                1,
                now - Duration::days(days),
            ))
            .await;
        }

        let removed = log.purge_before(now - Duration::days(30)).await.unwrap();
        assert_eq!(removed, 1);
        assert_eq!(log.count_total().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn unavailable_log_still_counts_record_attempts() {
        let log = InMemoryLogStore::new();
        log.set_unavailable(true);

        let params = SearchParams::Keyword {
            keyword: "dog".to_string(),
        };
        assert!(log.record_search(&params, 3).await.is_err());
        assert_eq!(log.record_calls(), 1);

        log.set_unavailable(false);
        assert_eq!(log.count_total().await.unwrap(), 0);
    }
}
