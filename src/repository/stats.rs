//! Statistics repository (whole-table aggregates)

use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{AuthorWithBooks, CatalogStats, CatalogTotals, YearCount},
    query::AuthorQuery,
};

const TOTALS_SQL: &str = r#"
    SELECT COUNT(*) AS total_books,
           COUNT(*) FILTER (WHERE is_available) AS available_books,
           COUNT(DISTINCT author_id) AS total_authors
    FROM books
"#;

const BY_YEAR_SQL: &str = r#"
    SELECT EXTRACT(YEAR FROM published_date)::INT AS year,
           COUNT(*) AS count
    FROM books
    GROUP BY 1
    ORDER BY 1 DESC
"#;

#[derive(Clone)]
pub struct StatsRepository {
    pool: Pool<Postgres>,
}

impl StatsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Totals and top authors read inside one read-only repeatable-read
    /// transaction, so both parts describe the same snapshot.
    pub async fn catalog_stats(&self, top_authors: i64) -> AppResult<CatalogStats> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let totals = sqlx::query_as::<_, CatalogTotals>(TOTALS_SQL)
            .fetch_one(&mut *tx)
            .await?;

        let mut qb = AuthorQuery::top_by_books_sql(top_authors);
        let top_authors = qb
            .build_query_as::<AuthorWithBooks>()
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(CatalogStats {
            totals,
            top_authors,
        })
    }

    pub async fn books_by_year(&self) -> AppResult<Vec<YearCount>> {
        let rows = sqlx::query_as::<_, YearCount>(BY_YEAR_SQL)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }
}
