use crate::models::{GenreRecord, MovieRecord, YearRange};
use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::time::Duration;
use tracing::info;

pub mod repositories;

/// Handle on the relational movie catalog.
///
/// The catalog is read-only and used by a single interactive session, so the
/// pool is pinned to one connection.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_timeout(db_url, Duration::from_secs(10)).await
    }

    pub async fn with_timeout(db_url: &str, connect_timeout: Duration) -> Result<Self> {
        let conn = Database::connect(Self::options(db_url, connect_timeout)).await?;

        info!(backend = ?conn.get_database_backend(), "Catalog database connected");

        Ok(Self { conn })
    }

    /// Sets up the pool without opening a connection.
    ///
    /// An unreachable server is reported by the first query instead of here.
    pub async fn connect_lazy(db_url: &str, connect_timeout: Duration) -> Result<Self> {
        let mut opt = Self::options(db_url, connect_timeout);
        opt.min_connections(0).connect_lazy(true);

        let conn = Database::connect(opt).await?;

        info!(backend = ?conn.get_database_backend(), "Catalog pool ready");

        Ok(Self { conn })
    }

    fn options(db_url: &str, connect_timeout: Duration) -> ConnectOptions {
        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(1)
            .min_connections(1)
            .connect_timeout(connect_timeout)
            .acquire_timeout(connect_timeout)
            .sqlx_logging(false);
        opt
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    pub async fn close(self) -> Result<()> {
        self.conn.close().await?;
        info!("Catalog database connection closed");
        Ok(())
    }

    fn film_repo(&self) -> repositories::film::FilmRepository {
        repositories::film::FilmRepository::new(self.conn.clone())
    }

    fn category_repo(&self) -> repositories::category::CategoryRepository {
        repositories::category::CategoryRepository::new(self.conn.clone())
    }

    pub async fn search_films_by_keyword(
        &self,
        keyword: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<MovieRecord>> {
        self.film_repo()
            .search_by_keyword(keyword, offset, limit)
            .await
    }

    pub async fn search_films_by_genre_and_year(
        &self,
        genre: &str,
        year_from: i32,
        year_to: i32,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<MovieRecord>> {
        self.film_repo()
            .search_by_genre_and_year(genre, year_from, year_to, offset, limit)
            .await
    }

    pub async fn list_categories(&self) -> Result<Vec<GenreRecord>> {
        self.category_repo().list().await
    }

    pub async fn release_year_range(&self) -> Result<YearRange> {
        self.film_repo().year_range().await
    }

    pub async fn get_film(&self, film_id: i32) -> Result<Option<MovieRecord>> {
        self.film_repo().get(film_id).await
    }

    pub async fn get_film_genres(&self, film_id: i32) -> Result<Vec<String>> {
        self.film_repo().genre_names(film_id).await
    }

    pub async fn get_film_actor_count(&self, film_id: i32) -> Result<i64> {
        self.film_repo().actor_count(film_id).await
    }
}
