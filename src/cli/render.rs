//! Text rendering for catalog rows and log statistics.
//!
//! Every function returns lines instead of printing so the layout can be
//! checked in tests; callers decide where the text goes.

use crate::models::{
    GenreRecord, LogCollectionStats, MovieDetails, MovieRecord, PopularSearchSummary,
    RecentSearchSummary, SearchEvent, YearRange,
};

const NOT_AVAILABLE: &str = "N/A";
const ROW_SEPARATOR: &str = "**************************************************";

fn or_na<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| v.to_string())
}

/// Lines for one page of results. Rows are numbered from `offset + 1`.
#[must_use]
pub fn movie_page(offset: u64, movies: &[MovieRecord]) -> Vec<String> {
    let mut lines = Vec::with_capacity(movies.len() * 4 + 1);

    lines.push(format!(
        "Showing results {}-{}:",
        offset + 1,
        offset + movies.len() as u64
    ));

    for (position, movie) in (offset + 1..).zip(movies) {
        lines.extend(movie_row(position, movie));
    }

    lines
}

fn movie_row(position: u64, movie: &MovieRecord) -> Vec<String> {
    let mut facts = Vec::with_capacity(3);
    if let Some(genre) = &movie.genre {
        facts.push(format!("Genre: {genre}"));
    }
    facts.push(format!("Rating: {}", or_na(movie.rating.as_deref())));
    facts.push(format!("Length: {} min", or_na(movie.length_minutes)));

    vec![
        format!(
            "{position}. {} ({})",
            movie.title,
            or_na(movie.release_year)
        ),
        format!("   {}", facts.join(" | ")),
        format!(
            "   {}",
            movie
                .description
                .as_deref()
                .filter(|d| !d.trim().is_empty())
                .unwrap_or("No description available")
        ),
        ROW_SEPARATOR.to_string(),
    ]
}

#[must_use]
pub fn genre_list(genres: &[GenreRecord]) -> Vec<String> {
    if genres.is_empty() {
        return vec!["No genres found.".to_string()];
    }

    genres
        .iter()
        .enumerate()
        .map(|(i, genre)| format!("{}. {}", i + 1, genre.name))
        .collect()
}

#[must_use]
pub fn year_range(years: YearRange) -> String {
    format!("Release years: {} - {}", years.min, years.max)
}

#[must_use]
pub fn movie_details(details: &MovieDetails) -> Vec<String> {
    let movie = &details.movie;
    let genres = if details.genres.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        details.genres.join(", ")
    };

    vec![
        format!("{} (ID: {})", movie.title, movie.id),
        format!("{:-<70}", ""),
        format!("  Released:  {}", or_na(movie.release_year)),
        format!("  Rating:    {}", or_na(movie.rating.as_deref())),
        format!("  Length:    {} min", or_na(movie.length_minutes)),
        format!("  Genres:    {genres}"),
        format!("  Actors:    {}", details.actor_count),
        String::new(),
        movie
            .description
            .clone()
            .unwrap_or_else(|| "No description available".to_string()),
    ]
}

#[must_use]
pub fn popular_searches(searches: &[PopularSearchSummary]) -> Vec<String> {
    if searches.is_empty() {
        return vec!["No search data yet.".to_string()];
    }

    let mut lines = vec!["Most popular searches".to_string(), format!("{:-<70}", "")];
    for (i, search) in searches.iter().enumerate() {
        lines.push(format!("{}. '{}' [{}]", i + 1, search.search_text, search.kind));
        lines.push(format!(
            "   Searches: {} | Results: {}",
            search.count, search.total_results
        ));
        lines.push(format!(
            "   Last searched: {}",
            search.last_search.format("%d.%m.%Y %H:%M")
        ));
    }
    lines
}

#[must_use]
pub fn recent_searches(searches: &[RecentSearchSummary]) -> Vec<String> {
    if searches.is_empty() {
        return vec!["No search data yet.".to_string()];
    }

    let mut lines = vec!["Recent searches".to_string(), format!("{:-<70}", "")];
    for (i, search) in searches.iter().enumerate() {
        lines.push(format!("{}. '{}' [{}]", i + 1, search.search_text, search.kind));
        lines.push(format!(
            "   Results: {} | At: {}",
            search.results_count,
            search.timestamp.format("%d.%m.%Y %H:%M:%S")
        ));
    }
    lines
}

#[must_use]
pub fn history(events: &[SearchEvent]) -> Vec<String> {
    if events.is_empty() {
        return vec!["No matching log entries.".to_string()];
    }

    events
        .iter()
        .map(|event| {
            format!(
                "• {}  {:<10}  '{}'  ({} results)",
                event.timestamp.format("%Y-%m-%d %H:%M:%S"),
                event.kind.as_str(),
                event.search_text,
                event.results_count
            )
        })
        .collect()
}

#[must_use]
pub fn collection_stats(stats: &LogCollectionStats) -> Vec<String> {
    vec![
        "Search log".to_string(),
        format!("{:-<70}", ""),
        format!("  Total searches:     {}", stats.total),
        format!("  Keyword searches:   {}", stats.keyword),
        format!("  Genre/year searches: {}", stats.genre_year),
        format!("  Without results:    {}", stats.empty_results),
    ]
}
