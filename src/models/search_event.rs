//! Search log records and the statistics derived from them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which search flow produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchKind {
    Keyword,
    GenreYear,
}

impl SearchKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Keyword => "keyword",
            Self::GenreYear => "genre_year",
        }
    }
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "keyword" => Ok(Self::Keyword),
            "genre_year" => Ok(Self::GenreYear),
            other => Err(format!(
                "Unknown search type '{other}', expected 'keyword' or 'genre_year'"
            )),
        }
    }
}

/// Validated parameters of one logical search.
///
/// Serialized untagged so the stored `params` document is just the fields,
/// e.g. `{"keyword": "matrix"}` or `{"genre": "Action", "year_from": 2000, "year_to": 2010}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SearchParams {
    Keyword {
        keyword: String,
    },
    GenreYear {
        genre: String,
        year_from: i32,
        year_to: i32,
    },
}

impl SearchParams {
    #[must_use]
    pub const fn kind(&self) -> SearchKind {
        match self {
            Self::Keyword { .. } => SearchKind::Keyword,
            Self::GenreYear { .. } => SearchKind::GenreYear,
        }
    }

    /// Grouping key for statistics. Identical searches always yield the same text.
    #[must_use]
    pub fn normalized_text(&self) -> String {
        match self {
            Self::Keyword { keyword } => keyword.trim().to_lowercase(),
            Self::GenreYear {
                genre,
                year_from,
                year_to,
            } => format!("{} {year_from}-{year_to}", genre.trim()).to_lowercase(),
        }
    }
}

impl fmt::Display for SearchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keyword { keyword } => write!(f, "'{keyword}'"),
            Self::GenreYear {
                genre,
                year_from,
                year_to,
            } => write!(f, "{genre} ({year_from}-{year_to})"),
        }
    }
}

/// One appended search log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchEvent {
    pub id: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub date: NaiveDate,
    pub kind: SearchKind,
    pub search_text: String,
    pub params: Option<SearchParams>,
    pub results_count: i64,
}

impl SearchEvent {
    #[must_use]
    pub fn new(params: SearchParams, results_count: i64, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: None,
            timestamp,
            date: timestamp.date_naive(),
            kind: params.kind(),
            search_text: params.normalized_text(),
            params: Some(params),
            results_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopularSearchSummary {
    pub search_text: String,
    pub count: i64,
    pub last_search: DateTime<Utc>,
    pub total_results: i64,
    pub kind: SearchKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentSearchSummary {
    pub search_text: String,
    pub timestamp: DateTime<Utc>,
    pub kind: SearchKind,
    pub params: Option<SearchParams>,
    pub results_count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LogCollectionStats {
    pub total: u64,
    pub keyword: u64,
    pub genre_year: u64,
    pub empty_results: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_text_is_lowercased_and_trimmed() {
        let params = SearchParams::Keyword {
            keyword: "  The MATRIX ".to_string(),
        };
        assert_eq!(params.normalized_text(), "the matrix");
        assert_eq!(params.kind(), SearchKind::Keyword);
    }

    #[test]
    fn genre_text_uses_fixed_field_order() {
        let params = SearchParams::GenreYear {
            genre: "Action".to_string(),
            year_from: 2000,
            year_to: 2010,
        };
        assert_eq!(params.normalized_text(), "action 2000-2010");
        assert_eq!(params.kind(), SearchKind::GenreYear);
    }

    #[test]
    fn search_kind_round_trips_through_str() {
        for kind in [SearchKind::Keyword, SearchKind::GenreYear] {
            assert_eq!(kind.as_str().parse::<SearchKind>(), Ok(kind));
        }
        assert!("title".parse::<SearchKind>().is_err());
    }

    #[test]
    fn params_serialize_without_tag() {
        let params = SearchParams::GenreYear {
            genre: "Comedy".to_string(),
            year_from: 1990,
            year_to: 1999,
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"genre": "Comedy", "year_from": 1990, "year_to": 1999})
        );

        let back: SearchParams =
            serde_json::from_value(serde_json::json!({"keyword": "dog"})).unwrap();
        assert_eq!(
            back,
            SearchParams::Keyword {
                keyword: "dog".to_string()
            }
        );
    }

    #[test]
    fn new_event_derives_kind_text_and_date() {
        let ts = DateTime::parse_from_rfc3339("2024-03-05T22:15:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let event = SearchEvent::new(
            SearchParams::Keyword {
                keyword: "Dog".to_string(),
            },
            0,
            ts,
        );
        assert_eq!(event.kind, SearchKind::Keyword);
        assert_eq!(event.search_text, "dog");
        assert_eq!(event.date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(event.results_count, 0);
    }
}
