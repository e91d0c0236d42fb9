use crate::entities::{category, prelude::*};
use crate::models::GenreRecord;
use anyhow::Result;
use sea_orm::{DatabaseConnection, EntityTrait, FromQueryResult, QueryOrder, QuerySelect};

use super::{narrow, signed};

pub struct CategoryRepository {
    conn: DatabaseConnection,
}

impl CategoryRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Result<Vec<GenreRecord>> {
        let rows = Category::find()
            .select_only()
            .column_as(signed(category::Column::CategoryId), "category_id")
            .column(category::Column::Name)
            .order_by_asc(category::Column::Name)
            .into_model::<CategoryRow>()
            .all(&self.conn)
            .await?;

        rows.into_iter()
            .map(|row| {
                Ok(GenreRecord {
                    id: narrow(row.category_id)?,
                    name: row.name,
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, FromQueryResult)]
struct CategoryRow {
    category_id: i64,
    name: String,
}
