//! Aggregate queries for the catalog summary

use sqlx::{Pool, Postgres};

use crate::{error::AppResult, models::stats::CatalogStats};

#[derive(Clone)]
pub struct StatsRepository {
    pool: Pool<Postgres>,
}

impl StatsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn catalog(&self) -> AppResult<CatalogStats> {
        let stats = sqlx::query_as::<_, CatalogStats>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM books) AS total_books,
                (SELECT COALESCE(SUM(total_copies), 0)::BIGINT FROM books) AS total_copies,
                (SELECT COALESCE(SUM(available_copies), 0)::BIGINT FROM books) AS available_copies,
                (SELECT COUNT(*) FROM books WHERE available_copies <= 0) AS issued_books,
                (SELECT COUNT(*) FROM book_loans WHERE NOT is_returned) AS active_loans,
                (SELECT COUNT(*) FROM users) AS members
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(stats)
    }
}
