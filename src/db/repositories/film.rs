use crate::entities::{category, film, film_actor, film_category, prelude::*};
use crate::models::{MovieRecord, YearRange};
use anyhow::Result;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select,
};

use super::{narrow, signed, signed_expr};

pub struct FilmRepository {
    conn: DatabaseConnection,
}

impl FilmRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Case-insensitive substring match on title or description, ordered by title.
    pub async fn search_by_keyword(
        &self,
        keyword: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<MovieRecord>> {
        let pattern = like_pattern(keyword);

        let rows = select_movie_columns(Film::find())
            .filter(
                Condition::any()
                    .add(lower(film::Column::Title).like(LikeExpr::new(pattern.clone()).escape('\\')))
                    .add(
                        lower(film::Column::Description)
                            .like(LikeExpr::new(pattern).escape('\\')),
                    ),
            )
            .order_by_asc(film::Column::Title)
            .order_by_asc(film::Column::FilmId)
            .offset(offset)
            .limit(limit)
            .into_model::<FilmRow>()
            .all(&self.conn)
            .await?;

        rows.into_iter().map(FilmRow::into_record).collect()
    }

    /// Films of one genre released within `year_from..=year_to`, newest first.
    pub async fn search_by_genre_and_year(
        &self,
        genre: &str,
        year_from: i32,
        year_to: i32,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<MovieRecord>> {
        let rows = select_movie_columns(Film::find())
            .column_as(category::Column::Name, "genre")
            .join(JoinType::InnerJoin, film::Relation::FilmCategory.def())
            .join(JoinType::InnerJoin, film_category::Relation::Category.def())
            .filter(category::Column::Name.eq(genre))
            .filter(film::Column::ReleaseYear.between(year_from, year_to))
            .order_by_desc(film::Column::ReleaseYear)
            .order_by_asc(film::Column::Title)
            .order_by_asc(film::Column::FilmId)
            .offset(offset)
            .limit(limit)
            .into_model::<GenreFilmRow>()
            .all(&self.conn)
            .await?;

        rows.into_iter().map(GenreFilmRow::into_record).collect()
    }

    pub async fn year_range(&self) -> Result<YearRange> {
        let bounds = Film::find()
            .select_only()
            .column_as(
                signed_expr(Expr::col((film::Entity, film::Column::ReleaseYear)).min()),
                "min_year",
            )
            .column_as(
                signed_expr(Expr::col((film::Entity, film::Column::ReleaseYear)).max()),
                "max_year",
            )
            .into_model::<YearBounds>()
            .one(&self.conn)
            .await?;

        let Some(bounds) = bounds else {
            return Ok(YearRange::fallback());
        };

        Ok(YearRange::from_bounds(
            bounds.min_year.map(narrow).transpose()?,
            bounds.max_year.map(narrow).transpose()?,
        ))
    }

    pub async fn get(&self, film_id: i32) -> Result<Option<MovieRecord>> {
        let row = select_movie_columns(Film::find())
            .filter(film::Column::FilmId.eq(film_id))
            .into_model::<FilmRow>()
            .one(&self.conn)
            .await?;

        row.map(FilmRow::into_record).transpose()
    }

    pub async fn genre_names(&self, film_id: i32) -> Result<Vec<String>> {
        let names = Category::find()
            .select_only()
            .column(category::Column::Name)
            .join(JoinType::InnerJoin, category::Relation::FilmCategory.def())
            .filter(film_category::Column::FilmId.eq(film_id))
            .order_by_asc(category::Column::Name)
            .into_tuple::<String>()
            .all(&self.conn)
            .await?;

        Ok(names)
    }

    pub async fn actor_count(&self, film_id: i32) -> Result<i64> {
        let count = FilmActor::find()
            .filter(film_actor::Column::FilmId.eq(film_id))
            .count(&self.conn)
            .await?;

        Ok(i64::try_from(count)?)
    }
}

fn select_movie_columns(select: Select<film::Entity>) -> Select<film::Entity> {
    select
        .select_only()
        .column_as(signed(film::Column::FilmId), "film_id")
        .column(film::Column::Title)
        .column_as(signed(film::Column::ReleaseYear), "release_year")
        .column(film::Column::Description)
        .column(film::Column::Rating)
        .column_as(signed(film::Column::Length), "length")
}

fn lower(column: film::Column) -> Expr {
    Expr::expr(Func::lower(Expr::col((film::Entity, column))))
}

/// `%keyword%`, lower-cased, with LIKE wildcards escaped by `\`.
fn like_pattern(keyword: &str) -> String {
    let mut pattern = String::with_capacity(keyword.len() + 2);
    pattern.push('%');
    for c in keyword.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[derive(Debug, Clone, FromQueryResult)]
struct FilmRow {
    film_id: i64,
    title: String,
    release_year: Option<i64>,
    description: Option<String>,
    rating: Option<String>,
    length: Option<i64>,
}

impl FilmRow {
    fn into_record(self) -> Result<MovieRecord> {
        Ok(MovieRecord {
            id: narrow(self.film_id)?,
            title: self.title,
            release_year: self.release_year.map(narrow).transpose()?,
            description: self.description,
            rating: self.rating,
            length_minutes: self.length.map(narrow).transpose()?,
            genre: None,
        })
    }
}

#[derive(Debug, Clone, FromQueryResult)]
struct GenreFilmRow {
    film_id: i64,
    title: String,
    release_year: Option<i64>,
    description: Option<String>,
    rating: Option<String>,
    length: Option<i64>,
    genre: String,
}

impl GenreFilmRow {
    fn into_record(self) -> Result<MovieRecord> {
        Ok(MovieRecord {
            id: narrow(self.film_id)?,
            title: self.title,
            release_year: self.release_year.map(narrow).transpose()?,
            description: self.description,
            rating: self.rating,
            length_minutes: self.length.map(narrow).transpose()?,
            genre: Some(self.genre),
        })
    }
}

#[derive(Debug, Clone, FromQueryResult)]
struct YearBounds {
    min_year: Option<i64>,
    max_year: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_wraps_and_lowercases() {
        assert_eq!(like_pattern("Matrix"), "%matrix%");
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("c:\\"), "%c:\\\\%");
    }
}
