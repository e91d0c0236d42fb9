//! Input checks applied before any store is touched.

use crate::models::GenreRecord;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Keyword cannot be empty")]
    EmptyKeyword,

    #[error("Keyword must be at least {min} characters")]
    KeywordTooShort { min: usize },

    #[error("Genre cannot be empty")]
    EmptyGenre,

    #[error("Genre '{0}' not found")]
    UnknownGenre(String),

    #[error("Year must be a whole number, got '{0}'")]
    InvalidYear(String),

    #[error("Start year {from} cannot be after end year {to}")]
    InvertedYearRange { from: i32, to: i32 },
}

/// Trims and lower-cases a keyword, rejecting blank or too-short input.
pub fn validate_keyword(raw: &str, min_len: usize) -> Result<String, ValidationError> {
    let keyword = raw.trim().to_lowercase();
    if keyword.is_empty() {
        return Err(ValidationError::EmptyKeyword);
    }
    if keyword.chars().count() < min_len {
        return Err(ValidationError::KeywordTooShort { min: min_len });
    }
    Ok(keyword)
}

/// Accepts only a genre spelled exactly as one listed by the catalog.
pub fn validate_genre(raw: &str, genres: &[GenreRecord]) -> Result<String, ValidationError> {
    let genre = raw.trim();
    if genre.is_empty() {
        return Err(ValidationError::EmptyGenre);
    }
    if !genres.iter().any(|g| g.name == genre) {
        return Err(ValidationError::UnknownGenre(genre.to_string()));
    }
    Ok(genre.to_string())
}

pub fn parse_year(raw: &str) -> Result<i32, ValidationError> {
    let trimmed = raw.trim();
    trimmed
        .parse::<i32>()
        .map_err(|_| ValidationError::InvalidYear(trimmed.to_string()))
}

pub fn validate_year_range(raw_from: &str, raw_to: &str) -> Result<(i32, i32), ValidationError> {
    let from = parse_year(raw_from)?;
    let to = parse_year(raw_to)?;
    if from > to {
        return Err(ValidationError::InvertedYearRange { from, to });
    }
    Ok((from, to))
}
