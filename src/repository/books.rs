//! Books repository: executes the statements built by [`BookQuery`]

use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{BookCounts, BookDetailRow, BookWithAuthor},
    query::{BookQuery, PageWindow},
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Fetch one window of joined book rows
    pub async fn fetch(
        &self,
        query: &BookQuery,
        window: PageWindow,
    ) -> AppResult<Vec<BookWithAuthor>> {
        let mut qb = query.select_sql(window);
        tracing::debug!(
            sql = qb.sql(),
            offset = window.offset,
            limit = window.limit,
            "fetching books"
        );

        let rows = qb
            .build_query_as::<BookWithAuthor>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    pub async fn count(&self, query: &BookQuery) -> AppResult<BookCounts> {
        let mut qb = query.count_sql();
        tracing::debug!(sql = qb.sql(), "counting books");

        let counts = qb
            .build_query_as::<BookCounts>()
            .fetch_one(&self.pool)
            .await?;

        Ok(counts)
    }

    /// Book with its full author, or `None` when the id does not exist
    pub async fn get_by_id(&self, id: i64) -> AppResult<Option<BookDetailRow>> {
        let mut qb = BookQuery::detail_sql(id);

        let row = qb
            .build_query_as::<BookDetailRow>()
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }
}
