//! Repository layer for database operations

pub mod authors;
pub mod books;
pub mod stats;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{
        AuthorWithBooks, BookCounts, BookDetailRow, BookWithAuthor, CatalogStats, PopularAuthor,
        YearCount,
    },
    query::{AuthorQuery, BookQuery, PageWindow},
};

/// Read operations the services need from the catalog store.
///
/// Every method runs a bounded number of statements regardless of how many
/// rows match: list endpoints issue one joined fetch plus one count.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Joined book rows inside `window` of the ordered, filtered set
    async fn books_fetch(
        &self,
        query: &BookQuery,
        window: PageWindow,
    ) -> AppResult<Vec<BookWithAuthor>>;

    /// Total and available counts of the filtered set
    async fn books_count(&self, query: &BookQuery) -> AppResult<BookCounts>;

    async fn books_get(&self, id: i64) -> AppResult<Option<BookDetailRow>>;

    async fn books_by_year(&self) -> AppResult<Vec<YearCount>>;

    async fn authors_fetch(
        &self,
        query: &AuthorQuery,
        window: PageWindow,
    ) -> AppResult<Vec<AuthorWithBooks>>;

    async fn authors_count(&self, query: &AuthorQuery) -> AppResult<i64>;

    async fn authors_popular(&self) -> AppResult<Vec<PopularAuthor>>;

    /// Totals and the `top_authors` largest authors, from a single snapshot
    async fn catalog_stats(&self, top_authors: i64) -> AppResult<CatalogStats>;

    async fn ping(&self) -> AppResult<()>;
}

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub books: books::BooksRepository,
    pub authors: authors::AuthorsRepository,
    pub stats: stats::StatsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: books::BooksRepository::new(pool.clone()),
            authors: authors::AuthorsRepository::new(pool.clone()),
            stats: stats::StatsRepository::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl CatalogStore for Repository {
    async fn books_fetch(
        &self,
        query: &BookQuery,
        window: PageWindow,
    ) -> AppResult<Vec<BookWithAuthor>> {
        self.books.fetch(query, window).await
    }

    async fn books_count(&self, query: &BookQuery) -> AppResult<BookCounts> {
        self.books.count(query).await
    }

    async fn books_get(&self, id: i64) -> AppResult<Option<BookDetailRow>> {
        self.books.get_by_id(id).await
    }

    async fn books_by_year(&self) -> AppResult<Vec<YearCount>> {
        self.stats.books_by_year().await
    }

    async fn authors_fetch(
        &self,
        query: &AuthorQuery,
        window: PageWindow,
    ) -> AppResult<Vec<AuthorWithBooks>> {
        self.authors.fetch(query, window).await
    }

    async fn authors_count(&self, query: &AuthorQuery) -> AppResult<i64> {
        self.authors.count(query).await
    }

    async fn authors_popular(&self) -> AppResult<Vec<PopularAuthor>> {
        self.authors.popular().await
    }

    async fn catalog_stats(&self, top_authors: i64) -> AppResult<CatalogStats> {
        self.stats.catalog_stats(top_authors).await
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
