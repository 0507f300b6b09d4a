//! Catalog read service: book and author listings and book details

use std::sync::Arc;

use crate::{
    api::{authors::AuthorListResponse, books::BookListResponse},
    config::PaginationConfig,
    error::{AppError, AppResult},
    models::{BookDetail, PopularAuthor},
    query::{
        AuthorListParams, BookListParams, BookQuery, PageMeta, PageRequest, RecentBooksParams,
    },
    repository::CatalogStore,
};

/// Base path of pagination links for each listing
pub const BOOKS_PATH: &str = "/books/";
pub const RECENT_BOOKS_PATH: &str = "/books/recent/";
pub const AUTHORS_PATH: &str = "/authors/";

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
    pagination: PaginationConfig,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatalogStore>, pagination: PaginationConfig) -> Self {
        Self { store, pagination }
    }

    /// Filtered, ordered and paginated books with availability metadata
    pub async fn list_books(&self, params: &BookListParams) -> AppResult<BookListResponse> {
        let query = params.resolve()?;
        let page = params.page_request(&self.pagination);
        self.books_page(&query, &page, BOOKS_PATH).await
    }

    /// Books created in the last `days` days
    pub async fn recent_books(&self, params: &RecentBooksParams) -> AppResult<BookListResponse> {
        let query = params.resolve()?;
        let page = params.list.page_request(&self.pagination);
        self.books_page(&query, &page, RECENT_BOOKS_PATH).await
    }

    async fn books_page(
        &self,
        query: &BookQuery,
        page: &PageRequest,
        base_path: &str,
    ) -> AppResult<BookListResponse> {
        let counts = self.store.books_count(query).await?;
        let rows = self.store.books_fetch(query, page.window()).await?;

        tracing::debug!(
            total = counts.total,
            page = page.page,
            returned = rows.len(),
            "book page assembled"
        );

        Ok(BookListResponse::assemble(rows, counts, page, base_path))
    }

    /// Get a book with its nested author
    pub async fn get_book(&self, id: i64) -> AppResult<BookDetail> {
        self.store
            .books_get(id)
            .await?
            .map(BookDetail::from)
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    pub async fn list_authors(&self, params: &AuthorListParams) -> AppResult<AuthorListResponse> {
        let query = params.resolve()?;
        let page = params.page_request(&self.pagination);

        let total = self.store.authors_count(&query).await?;
        let results = self.store.authors_fetch(&query, page.window()).await?;

        Ok(AuthorListResponse {
            pagination: PageMeta::new(&page, total, AUTHORS_PATH),
            results,
        })
    }

    pub async fn popular_authors(&self) -> AppResult<Vec<PopularAuthor>> {
        self.store.authors_popular().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{AuthorWithBooks, Book, BookCounts, BookDetailRow, BookWithAuthor},
        query::{BookPredicate, PageWindow},
        repository::MockCatalogStore,
    };
    use chrono::{NaiveDate, TimeZone, Utc};

    fn row(id: i64, author_id: i64) -> BookWithAuthor {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        BookWithAuthor {
            book: Book {
                id,
                title: format!("Book {id}"),
                author_id,
                published_date: NaiveDate::from_ymd_opt(2020 + id as i32, 1, 1).unwrap(),
                is_available: true,
                created_at: now,
                updated_at: now,
            },
            author_name: format!("Author {author_id}"),
            author_email: format!("author{author_id}@example.com"),
        }
    }

    fn service(store: MockCatalogStore) -> CatalogService {
        CatalogService::new(Arc::new(store), PaginationConfig::default())
    }

    #[tokio::test]
    async fn test_list_books_by_author_and_availability() {
        let mut store = MockCatalogStore::new();
        store
            .expect_books_count()
            .withf(|query| {
                query.predicates()
                    == [BookPredicate::AuthorId(1), BookPredicate::Availability(true)]
            })
            .times(1)
            .returning(|_| Ok(BookCounts { total: 3, available: 3 }));
        store
            .expect_books_fetch()
            .withf(|_, window| *window == PageWindow { offset: 0, limit: 10 })
            .times(1)
            .returning(|_, _| Ok(vec![row(1, 1), row(2, 1), row(3, 1)]));

        let params = BookListParams {
            author_id: Some("1".into()),
            is_available: Some("true".into()),
            ..Default::default()
        };
        let response = service(store).list_books(&params).await.unwrap();

        assert_eq!(response.results.len(), 3);
        assert_eq!(response.meta.total_books, 3);
        assert_eq!(response.meta.available_books, 3);
        assert_eq!(response.meta.unavailable_books, 0);
        assert_eq!(response.pagination.total_pages, 1);
        assert_eq!(response.pagination.next, None);
        assert_eq!(response.pagination.previous, None);
    }

    #[tokio::test]
    async fn test_invalid_author_id_never_reaches_store() {
        let store = MockCatalogStore::new();
        let params = BookListParams {
            author_id: Some("one".into()),
            ..Default::default()
        };

        let err = service(store).list_books(&params).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("author_id")));
    }

    #[tokio::test]
    async fn test_clamped_page_size_reaches_store() {
        let mut store = MockCatalogStore::new();
        store
            .expect_books_count()
            .returning(|_| Ok(BookCounts { total: 250, available: 200 }));
        store
            .expect_books_fetch()
            .withf(|_, window| *window == PageWindow { offset: 100, limit: 100 })
            .returning(|_, _| Ok(Vec::new()));

        let params = BookListParams {
            page: Some("2".into()),
            page_size: Some("1000".into()),
            ..Default::default()
        };
        let response = service(store).list_books(&params).await.unwrap();

        assert_eq!(response.pagination.page_size, 100);
        assert_eq!(response.pagination.total_pages, 3);
        assert_eq!(
            response.pagination.next.as_deref(),
            Some("/books/?page=3&page_size=100")
        );
        assert_eq!(
            response.pagination.previous.as_deref(),
            Some("/books/?page=1&page_size=100")
        );
    }

    #[tokio::test]
    async fn test_recent_books_link_base() {
        let mut store = MockCatalogStore::new();
        store
            .expect_books_count()
            .withf(|query| matches!(query.predicates(), [BookPredicate::CreatedSince(_)]))
            .returning(|_| Ok(BookCounts { total: 11, available: 11 }));
        store
            .expect_books_fetch()
            .returning(|_, _| Ok(vec![row(1, 1)]));

        let response = service(store)
            .recent_books(&RecentBooksParams::default())
            .await
            .unwrap();
        assert_eq!(
            response.pagination.next.as_deref(),
            Some("/books/recent/?page=2&page_size=10")
        );
    }

    #[tokio::test]
    async fn test_get_book_missing_is_not_found() {
        let mut store = MockCatalogStore::new();
        store.expect_books_get().returning(|_| Ok(None));

        let err = service(store).get_book(99).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_get_book_nests_author() {
        let mut store = MockCatalogStore::new();
        store.expect_books_get().withf(|id| *id == 2).returning(|_| {
            Ok(Some(BookDetailRow {
                listing: row(2, 7),
                author_created_at: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
                author_books_count: 4,
            }))
        });

        let detail = service(store).get_book(2).await.unwrap();
        assert_eq!(detail.author.id, 7);
        assert_eq!(detail.author.name, "Author 7");
        assert_eq!(detail.author.books_count, 4);
        assert_eq!(detail.author_email, "author7@example.com");
    }

    #[tokio::test]
    async fn test_list_authors() {
        let mut store = MockCatalogStore::new();
        store
            .expect_authors_count()
            .withf(|query| query.min_books_filter() == Some(4))
            .returning(|_| Ok(1));
        store.expect_authors_fetch().returning(|_, _| {
            Ok(vec![AuthorWithBooks {
                id: 1,
                name: "William S. Vincent".into(),
                email: "william@example.com".into(),
                books_count: 4,
                created_at: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
            }])
        });

        let params = AuthorListParams {
            min_books: Some("4".into()),
            ..Default::default()
        };
        let response = service(store).list_authors(&params).await.unwrap();
        assert_eq!(response.pagination.count, 1);
        assert_eq!(response.results[0].books_count, 4);
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let mut store = MockCatalogStore::new();
        store
            .expect_books_count()
            .returning(|_| Err(AppError::Database(sqlx::Error::PoolTimedOut)));

        let err = service(store)
            .list_books(&BookListParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }
}
