//! Interactive menu loop.

use std::io::BufRead;

use tracing::{debug, warn};

use super::console::{StdConsole, prompt_line};
use super::render;
use crate::services::{SearchError, SearchOutcome, SearchService};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    KeywordSearch,
    GenreYearSearch,
    PopularSearches,
    RecentSearches,
    Exit,
}

impl MenuChoice {
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::KeywordSearch),
            "2" => Some(Self::GenreYearSearch),
            "3" => Some(Self::PopularSearches),
            "4" => Some(Self::RecentSearches),
            "5" => Some(Self::Exit),
            _ => None,
        }
    }
}

fn print_menu() {
    println!();
    println!("{:=<50}", "");
    println!(" MOVIE SEARCH");
    println!("{:=<50}", "");
    println!("1. Search by keyword");
    println!("2. Search by genre and years");
    println!("3. Popular searches");
    println!("4. Recent searches");
    println!("5. Exit");
    println!("{:=<50}", "");
}

/// Runs the menu until the user exits or `input` is closed.
///
/// Store failures are shown and the menu resumes; only terminal I/O errors
/// end the loop early.
pub async fn run_shell<R: BufRead>(
    service: &SearchService,
    stats_limit: usize,
    input: R,
) -> anyhow::Result<()> {
    let mut console = StdConsole::new(input);
    println!("\nWelcome!");

    loop {
        print_menu();
        let Some(choice) = prompt_line(console.input(), "\nSelect an option (1-5): ")? else {
            debug!("Input closed, leaving shell");
            break;
        };

        match MenuChoice::parse(&choice) {
            Some(MenuChoice::KeywordSearch) => keyword_search(service, &mut console).await?,
            Some(MenuChoice::GenreYearSearch) => genre_year_search(service, &mut console).await?,
            Some(MenuChoice::PopularSearches) => show_popular(service, stats_limit).await,
            Some(MenuChoice::RecentSearches) => show_recent(service, stats_limit).await,
            Some(MenuChoice::Exit) => {
                println!("\nGoodbye!");
                break;
            }
            None => println!("Invalid choice. Please try again."),
        }
    }

    Ok(())
}

async fn keyword_search<R: BufRead>(
    service: &SearchService,
    console: &mut StdConsole<R>,
) -> anyhow::Result<()> {
    println!("\nKEYWORD SEARCH");
    println!("{:-<30}", "");

    let Some(raw) = prompt_line(console.input(), "Enter a keyword: ")? else {
        return Ok(());
    };

    match service.prepare_keyword(&raw) {
        Ok(params) => report(service.run(params, console).await),
        Err(err) => println!("{err}"),
    }

    Ok(())
}

async fn genre_year_search<R: BufRead>(
    service: &SearchService,
    console: &mut StdConsole<R>,
) -> anyhow::Result<()> {
    println!("\nGENRE AND YEAR SEARCH");
    println!("{:-<30}", "");

    let context = match service.genre_search_context().await {
        Ok(context) => context,
        Err(err) => {
            println!("{err}");
            return Ok(());
        }
    };

    println!("Available genres:");
    for line in render::genre_list(&context.genres) {
        println!("{line}");
    }
    println!("\n{}", render::year_range(context.years));

    let Some(genre) = prompt_line(console.input(), "\nEnter a genre: ")? else {
        return Ok(());
    };
    let Some(year_from) = prompt_line(console.input(), "Year from (e.g. 1990): ")? else {
        return Ok(());
    };
    let Some(year_to) = prompt_line(console.input(), "Year to (e.g. 2020): ")? else {
        return Ok(());
    };

    match service.prepare_genre_year(&genre, &year_from, &year_to, &context.genres) {
        Ok(params) => report(service.run(params, console).await),
        Err(err) => println!("{err}"),
    }

    Ok(())
}

fn report(result: Result<SearchOutcome, SearchError>) {
    match result {
        Ok(outcome) => {
            if !outcome.was_logged() {
                debug!(search = %outcome.params, "Search shown without a log entry");
            }
        }
        Err(SearchError::Catalog(err)) => {
            warn!(error = %err, "Search failed");
            println!("Search failed: {err}");
        }
        Err(err) => println!("{err}"),
    }
}

async fn show_popular(service: &SearchService, limit: usize) {
    println!("\nPOPULAR SEARCHES");
    println!("{:-<30}", "");

    match service.popular_searches(limit).await {
        Ok(searches) => {
            for line in render::popular_searches(&searches) {
                println!("{line}");
            }
        }
        Err(err) => println!("Statistics unavailable: {err}"),
    }
}

async fn show_recent(service: &SearchService, limit: usize) {
    println!("\nRECENT SEARCHES");
    println!("{:-<30}", "");

    match service.recent_searches(limit).await {
        Ok(searches) => {
            for line in render::recent_searches(&searches) {
                println!("{line}");
            }
        }
        Err(err) => println!("Statistics unavailable: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{InMemoryCatalogStore, InMemoryLogStore};
    use std::sync::Arc;

    #[test]
    fn test_menu_choice_parse() {
        assert_eq!(MenuChoice::parse("1"), Some(MenuChoice::KeywordSearch));
        assert_eq!(MenuChoice::parse(" 2 "), Some(MenuChoice::GenreYearSearch));
        assert_eq!(MenuChoice::parse("5"), Some(MenuChoice::Exit));
        assert_eq!(MenuChoice::parse("6"), None);
        assert_eq!(MenuChoice::parse("exit"), None);
    }

    #[tokio::test]
    async fn shell_exits_when_input_closes() {
        let catalog = Arc::new(InMemoryCatalogStore::new());
        let log = Arc::new(InMemoryLogStore::new());
        let service = SearchService::new(catalog, log.clone());

        run_shell(&service, 5, &b"9\n1\nx\n"[..]).await.unwrap();

        assert_eq!(log.record_calls(), 0);
    }

    #[tokio::test]
    async fn shell_keyword_search_is_logged() {
        let catalog = Arc::new(InMemoryCatalogStore::new());
        let log = Arc::new(InMemoryLogStore::new());
        let service = SearchService::new(catalog, log.clone());

        run_shell(&service, 5, &b"1\n  Matrix \n3\n4\n5\n"[..])
            .await
            .unwrap();

        let events = log.events().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].search_text, "matrix");
        assert_eq!(events[0].results_count, 0);
    }
}
