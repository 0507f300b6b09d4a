//! Authors repository

use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{AuthorWithBooks, PopularAuthor},
    query::{AuthorQuery, PageWindow},
};

#[derive(Clone)]
pub struct AuthorsRepository {
    pool: Pool<Postgres>,
}

impl AuthorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn fetch(
        &self,
        query: &AuthorQuery,
        window: PageWindow,
    ) -> AppResult<Vec<AuthorWithBooks>> {
        let mut qb = query.select_sql(window);
        tracing::debug!(sql = qb.sql(), "fetching authors");

        let authors = qb
            .build_query_as::<AuthorWithBooks>()
            .fetch_all(&self.pool)
            .await?;

        Ok(authors)
    }

    pub async fn count(&self, query: &AuthorQuery) -> AppResult<i64> {
        let mut qb = query.count_sql();

        let total: i64 = qb.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        Ok(total)
    }

    pub async fn popular(&self) -> AppResult<Vec<PopularAuthor>> {
        let mut qb = AuthorQuery::popular_sql();

        let authors = qb
            .build_query_as::<PopularAuthor>()
            .fetch_all(&self.pool)
            .await?;

        Ok(authors)
    }
}
