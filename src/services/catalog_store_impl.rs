//! `SeaORM` implementation of the `CatalogStore` trait.

use crate::db::Store;
use crate::models::{GenreRecord, MovieDetails, MovieRecord, YearRange};
use crate::services::catalog_store::{CatalogError, CatalogStore};
use async_trait::async_trait;
use tracing::debug;

pub struct SeaOrmCatalogStore {
    store: Store,
}

impl SeaOrmCatalogStore {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Releases the underlying connection.
    pub async fn close(self) -> anyhow::Result<()> {
        self.store.close().await
    }
}

#[async_trait]
impl CatalogStore for SeaOrmCatalogStore {
    async fn search_by_keyword(
        &self,
        keyword: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<MovieRecord>, CatalogError> {
        let movies = self
            .store
            .search_films_by_keyword(keyword, offset, limit)
            .await?;
        debug!(keyword, offset, limit, rows = movies.len(), "Keyword page fetched");
        Ok(movies)
    }

    async fn search_by_genre_and_year(
        &self,
        genre: &str,
        year_from: i32,
        year_to: i32,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<MovieRecord>, CatalogError> {
        let movies = self
            .store
            .search_films_by_genre_and_year(genre, year_from, year_to, offset, limit)
            .await?;
        debug!(
            genre,
            year_from,
            year_to,
            offset,
            limit,
            rows = movies.len(),
            "Genre page fetched"
        );
        Ok(movies)
    }

    async fn list_genres(&self) -> Result<Vec<GenreRecord>, CatalogError> {
        Ok(self.store.list_categories().await?)
    }

    async fn year_range(&self) -> Result<YearRange, CatalogError> {
        Ok(self.store.release_year_range().await?)
    }

    async fn movie_details(&self, id: i32) -> Result<Option<MovieDetails>, CatalogError> {
        let Some(movie) = self.store.get_film(id).await? else {
            return Ok(None);
        };

        let genres = self.store.get_film_genres(id).await?;
        let actor_count = self.store.get_film_actor_count(id).await?;

        Ok(Some(MovieDetails {
            movie,
            genres,
            actor_count,
        }))
    }

    async fn ping(&self) -> Result<(), CatalogError> {
        Ok(self.store.ping().await?)
    }
}
