//! Catalog records as returned by the catalog store.

use serde::Serialize;

use crate::constants::FALLBACK_RELEASE_YEAR;

/// A single film row.
///
/// `genre` is only populated when the row came from a genre search, where the
/// join already carries the category name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovieRecord {
    pub id: i32,
    pub title: String,
    pub release_year: Option<i32>,
    pub description: Option<String>,
    pub rating: Option<String>,
    pub length_minutes: Option<i32>,
    pub genre: Option<String>,
}

impl MovieRecord {
    #[must_use]
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        let needle = keyword.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle))
    }
}

/// Full view of a film with its genres and cast size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovieDetails {
    pub movie: MovieRecord,
    pub genres: Vec<String>,
    pub actor_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreRecord {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl YearRange {
    /// Range reported when the catalog holds no dated films.
    #[must_use]
    pub const fn fallback() -> Self {
        Self {
            min: FALLBACK_RELEASE_YEAR,
            max: FALLBACK_RELEASE_YEAR,
        }
    }

    /// Builds a range from nullable aggregates, falling back when either bound is missing.
    #[must_use]
    pub fn from_bounds(min: Option<i32>, max: Option<i32>) -> Self {
        match (min, max) {
            (Some(min), Some(max)) => Self { min, max },
            _ => Self::fallback(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(title: &str, description: Option<&str>) -> MovieRecord {
        MovieRecord {
            id: 1,
            title: title.to_string(),
            release_year: Some(2006),
            description: description.map(str::to_string),
            rating: Some("PG".to_string()),
            length_minutes: Some(90),
            genre: None,
        }
    }

    #[test]
    fn keyword_matches_title_or_description_ignoring_case() {
        let m = movie("ACADEMY DINOSAUR", Some("A Epic Drama of a Feminist"));
        assert!(m.matches_keyword("dinosaur"));
        assert!(m.matches_keyword("FEMINIST"));
        assert!(!m.matches_keyword("matrix"));
    }

    #[test]
    fn keyword_does_not_match_missing_description() {
        let m = movie("ALIEN CENTER", None);
        assert!(!m.matches_keyword("drama"));
    }

    #[test]
    fn year_range_falls_back_when_empty() {
        assert_eq!(YearRange::from_bounds(None, None), YearRange::fallback());
        assert_eq!(YearRange::from_bounds(Some(1990), None).min, 2006);
        assert_eq!(
            YearRange::from_bounds(Some(1990), Some(2010)),
            YearRange {
                min: 1990,
                max: 2010
            }
        );
    }
}
