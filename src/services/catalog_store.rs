//! Read access to the relational movie catalog.
//!
//! This module provides the [`CatalogStore`] trait. Implementations issue a
//! single attempt per call; retry policy belongs to the caller.

use crate::models::{GenreRecord, MovieDetails, MovieRecord, YearRange};
use thiserror::Error;

/// Any connectivity or query failure against the catalog.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

impl From<sea_orm::DbErr> for CatalogError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Unavailable(err.to_string())
    }
}

impl From<anyhow::Error> for CatalogError {
    fn from(err: anyhow::Error) -> Self {
        Self::Unavailable(format!("{err:#}"))
    }
}

#[async_trait::async_trait]
pub trait CatalogStore: Send + Sync {
    /// Films whose title or description contains `keyword`, ignoring case.
    ///
    /// Rows are ordered by title ascending; at most `limit` rows are returned
    /// starting at `offset`. Empty keywords are rejected by the caller.
    ///
    /// # Errors
    ///
    /// - Returns [`CatalogError::Unavailable`] on connection or query failures
    async fn search_by_keyword(
        &self,
        keyword: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<MovieRecord>, CatalogError>;

    /// Films of exactly `genre` released within `year_from..=year_to`.
    ///
    /// Ordered by release year descending, then title ascending. Each record
    /// carries the genre label.
    ///
    /// # Errors
    ///
    /// - Returns [`CatalogError::Unavailable`] on connection or query failures
    async fn search_by_genre_and_year(
        &self,
        genre: &str,
        year_from: i32,
        year_to: i32,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<MovieRecord>, CatalogError>;

    /// All genres ordered by name.
    async fn list_genres(&self) -> Result<Vec<GenreRecord>, CatalogError>;

    /// Global release year bounds, or [`YearRange::fallback`] for an empty catalog.
    async fn year_range(&self) -> Result<YearRange, CatalogError>;

    /// Full record with genre names and actor count, `None` if the id is unknown.
    async fn movie_details(&self, id: i32) -> Result<Option<MovieDetails>, CatalogError>;

    async fn ping(&self) -> Result<(), CatalogError>;
}
