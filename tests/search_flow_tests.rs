//! End-to-end search flows over the in-memory stores with a scripted console.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use movie_search::models::{MovieRecord, SearchEvent, SearchKind, SearchParams};
use movie_search::services::{
    CatalogError, InMemoryCatalogStore, InMemoryLogStore, LogStore, SearchConsole, SearchError,
    SearchService, ValidationError,
};

#[derive(Default)]
struct ScriptedConsole {
    answers: VecDeque<bool>,
    pages: Vec<Vec<String>>,
    offsets: Vec<u64>,
    prompts: usize,
    no_results: usize,
    end_of_results: usize,
    interruptions: Vec<CatalogError>,
}

impl ScriptedConsole {
    fn answering(answers: &[bool]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
            ..Self::default()
        }
    }
}

impl SearchConsole for ScriptedConsole {
    fn show_page(&mut self, _params: &SearchParams, offset: u64, movies: &[MovieRecord]) {
        self.offsets.push(offset);
        self.pages
            .push(movies.iter().map(|m| m.title.clone()).collect());
    }

    fn show_no_results(&mut self, _params: &SearchParams) {
        self.no_results += 1;
    }

    fn show_end_of_results(&mut self) {
        self.end_of_results += 1;
    }

    fn confirm_next_page(&mut self, _page_size: u64) -> bool {
        self.prompts += 1;
        self.answers.pop_front().unwrap_or(false)
    }

    fn show_interrupted(&mut self, error: &CatalogError) {
        self.interruptions.push(error.clone());
    }
}

fn film(id: i32, title: &str, year: i32, description: &str) -> MovieRecord {
    MovieRecord {
        id,
        title: title.to_string(),
        release_year: Some(year),
        description: Some(description.to_string()),
        rating: Some("PG-13".to_string()),
        length_minutes: Some(120),
        genre: None,
    }
}

/// 25 "MATRIX" films plus a handful of others spread over three genres.
fn catalog() -> InMemoryCatalogStore {
    let mut catalog = InMemoryCatalogStore::new()
        .with_genre(1, "Action")
        .with_genre(2, "Comedy")
        .with_genre(3, "Sci-Fi");

    for i in 1..=25 {
        catalog = catalog.with_film(
            film(i, &format!("MATRIX {:02}", 26 - i), 1990 + i, "Simulated reality"),
            &["Sci-Fi"],
        );
    }
    catalog
        .with_film(
            film(100, "ACADEMY DINOSAUR", 2006, "An epic drama in the Matrix"),
            &["Action"],
        )
        .with_film(film(101, "BLADE RUNNER", 1982, "Replicants"), &["Action", "Sci-Fi"])
        .with_film(film(102, "CLUELESS", 1995, "Teen comedy"), &["Comedy"])
}

fn setup() -> (SearchService, Arc<InMemoryCatalogStore>, Arc<InMemoryLogStore>) {
    let catalog = Arc::new(catalog());
    let log = Arc::new(InMemoryLogStore::new());
    let service = SearchService::new(catalog.clone(), log.clone()).with_limits(10, 2);
    (service, catalog, log)
}

#[tokio::test]
async fn viewing_three_pages_writes_one_log_entry() {
    let (service, catalog, log) = setup();
    let params = service.prepare_keyword("Matrix").unwrap();
    let mut console = ScriptedConsole::answering(&[true, true]);

    let outcome = service.run(params, &mut console).await.unwrap();

    assert_eq!(console.offsets, [0, 10, 20]);
    assert_eq!(console.pages[2].len(), 6);
    assert_eq!(console.prompts, 2);
    assert_eq!(console.end_of_results, 1);
    assert_eq!(catalog.search_calls(), 3);
    assert_eq!(outcome.rows_shown, 26);

    let events = log.events().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, SearchKind::Keyword);
    assert_eq!(events[0].search_text, "matrix");
    assert_eq!(events[0].results_count, 10);
}

#[tokio::test]
async fn keyword_first_page_is_sorted_and_prompts_when_full() {
    let (service, _, _) = setup();
    let params = service.prepare_keyword("matrix").unwrap();
    let mut console = ScriptedConsole::answering(&[false]);

    let outcome = service.run(params, &mut console).await.unwrap();

    let page = &console.pages[0];
    assert_eq!(page.len(), 10);
    let mut sorted = page.clone();
    sorted.sort();
    assert_eq!(page, &sorted);
    assert_eq!(page[0], "ACADEMY DINOSAUR");
    assert_eq!(console.prompts, 1);
    assert_eq!(outcome.pages_shown, 1);
}

#[tokio::test]
async fn short_page_does_not_prompt() {
    let (service, _, log) = setup();
    let params = service.prepare_keyword("blade").unwrap();
    let mut console = ScriptedConsole::answering(&[true]);

    service.run(params, &mut console).await.unwrap();

    assert_eq!(console.pages, [vec!["BLADE RUNNER".to_string()]]);
    assert_eq!(console.prompts, 0);
    assert_eq!(console.end_of_results, 1);
    assert_eq!(log.record_calls(), 1);
}

#[tokio::test]
async fn zero_result_search_is_logged_and_counted() {
    let (service, _, log) = setup();
    let params = service.prepare_keyword("nonexistent").unwrap();
    let mut console = ScriptedConsole::default();

    let outcome = service.run(params, &mut console).await.unwrap();

    assert_eq!(console.no_results, 1);
    assert!(console.pages.is_empty());
    assert!(outcome.was_logged());
    assert_eq!(log.events().await[0].results_count, 0);
    assert_eq!(log.count_empty_results().await.unwrap(), 1);

    let stats = service.collection_stats().await.unwrap();
    assert_eq!(stats.total, 1);
    assert_eq!(stats.empty_results, 1);
    assert_eq!(stats.keyword, 1);
    assert_eq!(stats.genre_year, 0);
}

#[tokio::test]
async fn genre_year_search_records_normalized_text() {
    let (service, _, log) = setup();
    let context = service.genre_search_context().await.unwrap();
    assert_eq!(context.genres.len(), 3);
    assert_eq!(context.years.min, 1982);
    assert_eq!(context.years.max, 2015);

    let params = service
        .prepare_genre_year("Sci-Fi", "1980", "1995", &context.genres)
        .unwrap();
    let mut console = ScriptedConsole::answering(&[true]);

    service.run(params, &mut console).await.unwrap();

    assert_eq!(console.offsets, [0]);
    assert_eq!(console.pages[0].len(), 6);
    assert_eq!(console.pages[0][0], "MATRIX 21");
    assert_eq!(console.pages[0][5], "BLADE RUNNER");

    let events = log.events().await;
    assert_eq!(events[0].kind, SearchKind::GenreYear);
    assert_eq!(events[0].search_text, "sci-fi 1980-1995");
    assert_eq!(
        events[0].params,
        Some(SearchParams::GenreYear {
            genre: "Sci-Fi".to_string(),
            year_from: 1980,
            year_to: 1995
        })
    );
}

#[tokio::test]
async fn later_page_failure_keeps_first_page_and_log_entry() {
    let (service, catalog, log) = setup();
    catalog.fail_searches_after(1).await;
    let params = service.prepare_keyword("matrix").unwrap();
    let mut console = ScriptedConsole::answering(&[true, true]);

    let outcome = service.run(params, &mut console).await.unwrap();

    assert_eq!(console.pages.len(), 1);
    assert_eq!(console.interruptions.len(), 1);
    assert!(outcome.was_interrupted());
    assert_eq!(outcome.rows_shown, 10);
    assert_eq!(log.events().await.len(), 1);
}

#[tokio::test]
async fn first_page_failure_is_an_error_without_log_entry() {
    let (service, catalog, log) = setup();
    catalog.set_unavailable(true);
    let params = service.prepare_keyword("matrix").unwrap();

    let result = service.run(params, &mut ScriptedConsole::default()).await;

    assert!(matches!(result, Err(SearchError::Catalog(_))));
    assert_eq!(log.record_calls(), 0);
}

#[tokio::test]
async fn log_failure_still_shows_results() {
    let (service, _, log) = setup();
    log.set_unavailable(true);
    let params = service.prepare_keyword("clueless").unwrap();
    let mut console = ScriptedConsole::default();

    let outcome = service.run(params, &mut console).await.unwrap();

    assert_eq!(console.pages, [vec!["CLUELESS".to_string()]]);
    assert!(!outcome.was_logged());
    assert_eq!(log.record_calls(), 1);
}

#[tokio::test]
async fn validation_failures_touch_no_store() {
    let (service, catalog, log) = setup();
    let genres = service.genre_search_context().await.unwrap().genres;

    assert_eq!(
        service.prepare_keyword("   "),
        Err(SearchError::Validation(ValidationError::EmptyKeyword))
    );
    assert!(matches!(
        service.prepare_genre_year("sci-fi", "1990", "2000", &genres),
        Err(SearchError::Validation(ValidationError::UnknownGenre(_)))
    ));
    assert!(matches!(
        service.prepare_genre_year("Sci-Fi", "2020", "2000", &genres),
        Err(SearchError::Validation(ValidationError::InvertedYearRange { .. }))
    ));
    assert!(matches!(
        service.prepare_genre_year("Sci-Fi", "abc", "2000", &genres),
        Err(SearchError::Validation(ValidationError::InvalidYear(_)))
    ));

    assert_eq!(catalog.search_calls(), 0);
    assert_eq!(log.record_calls(), 0);
}

#[tokio::test]
async fn repeated_searches_rank_by_count_then_recency() {
    let (service, _, log) = setup();
    let base = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let keyword = |k: &str| SearchParams::Keyword {
        keyword: k.to_string(),
    };

    for i in 0..5 {
        log.push_event(SearchEvent::new(keyword("a"), 3, base + Duration::minutes(10 + i)))
            .await;
        log.push_event(SearchEvent::new(keyword("b"), 1, base + Duration::minutes(i)))
            .await;
    }
    for i in 0..3 {
        log.push_event(SearchEvent::new(keyword("c"), 0, base + Duration::minutes(30 + i)))
            .await;
    }

    let popular = service.popular_searches(5).await.unwrap();
    let texts: Vec<&str> = popular.iter().map(|p| p.search_text.as_str()).collect();
    assert_eq!(texts, ["a", "b", "c"]);
    assert_eq!(popular[0].count, 5);
    assert_eq!(popular[0].total_results, 15);

    let recent = service.recent_searches(2).await.unwrap();
    let texts: Vec<&str> = recent.iter().map(|r| r.search_text.as_str()).collect();
    assert_eq!(texts, ["c", "a"]);
    assert_eq!(recent[0].timestamp, base + Duration::minutes(32));
}

#[tokio::test]
async fn history_and_purge() {
    let (service, _, log) = setup();
    let now = Utc::now();
    let keyword = SearchParams::Keyword {
        keyword: "old".to_string(),
    };
    let genre = SearchParams::GenreYear {
        genre: "Action".to_string(),
        year_from: 2000,
        year_to: 2010,
    };

    log.push_event(SearchEvent::new(keyword.clone(), 2, now - Duration::days(40)))
        .await;
    log.push_event(SearchEvent::new(genre, 4, now - Duration::days(1)))
        .await;
    log.push_event(SearchEvent::new(keyword, 1, now)).await;

    let today = service.history_by_date(now.date_naive()).await.unwrap();
    assert_eq!(today.len(), 1);

    let keywords = service
        .history_by_kind(SearchKind::Keyword, 10)
        .await
        .unwrap();
    assert_eq!(keywords.len(), 2);
    assert!(keywords[0].timestamp > keywords[1].timestamp);

    assert_eq!(service.purge_older_than(30).await.unwrap(), 1);
    assert_eq!(log.count_total().await.unwrap(), 2);
}
