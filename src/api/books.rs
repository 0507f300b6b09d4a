//! Book endpoints and the list response envelope

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    api::Params,
    error::{AppError, AppResult},
    models::{BookCounts, BookDetail, BookSummary, BookWithAuthor},
    query::{BookListParams, PageMeta, PageRequest, RecentBooksParams},
    AppState,
};

/// Availability breakdown of the filtered set, before pagination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct BookListMeta {
    pub total_books: i64,
    pub available_books: i64,
    pub unavailable_books: i64,
}

impl From<BookCounts> for BookListMeta {
    fn from(counts: BookCounts) -> Self {
        Self {
            total_books: counts.total,
            available_books: counts.available,
            unavailable_books: counts.unavailable(),
        }
    }
}

/// Paginated list of books
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookListResponse {
    #[serde(flatten)]
    pub pagination: PageMeta,
    pub meta: BookListMeta,
    pub results: Vec<BookSummary>,
}

impl BookListResponse {
    /// Combine one page of joined rows with the counts of the whole filtered set
    pub fn assemble(
        rows: Vec<BookWithAuthor>,
        counts: BookCounts,
        request: &PageRequest,
        base_path: &str,
    ) -> Self {
        Self {
            pagination: PageMeta::new(request, counts.total, base_path),
            meta: BookListMeta::from(counts),
            results: rows.into_iter().map(BookSummary::from).collect(),
        }
    }
}

/// List books with filtering, search, ordering and pagination
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(
        ("author_id" = Option<i64>, Query, description = "Filter by author id"),
        ("is_available" = Option<String>, Query, description = "true/1/yes or false/0/no"),
        ("author_name" = Option<String>, Query, description = "Author name contains (case-insensitive)"),
        ("published_after" = Option<String>, Query, description = "Published on or after (YYYY-MM-DD)"),
        ("published_before" = Option<String>, Query, description = "Published on or before (YYYY-MM-DD)"),
        ("title_contains" = Option<String>, Query, description = "Title contains (case-insensitive)"),
        ("search" = Option<String>, Query, description = "Search in title and author name"),
        ("ordering" = Option<String>, Query, description = "published_date, created_at or title; prefix with - for descending"),
        ("page" = Option<i64>, Query, description = "Page number (default: 1)"),
        ("page_size" = Option<i64>, Query, description = "Books per page (default: 10, max: 100)")
    ),
    responses(
        (status = 200, description = "Page of books", body = BookListResponse),
        (status = 400, description = "Invalid filter value", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    Params(params): Params<BookListParams>,
) -> AppResult<Json<BookListResponse>> {
    let books = state.services.catalog.list_books(&params).await?;
    Ok(Json(books))
}

/// List books added recently, newest first
#[utoipa::path(
    get,
    path = "/books/recent",
    tag = "books",
    params(
        ("days" = Option<i64>, Query, description = "Look-back window in days (default: 30)"),
        ("page" = Option<i64>, Query, description = "Page number (default: 1)"),
        ("page_size" = Option<i64>, Query, description = "Books per page (default: 10, max: 100)")
    ),
    responses(
        (status = 200, description = "Page of recently added books", body = BookListResponse),
        (status = 400, description = "Invalid parameter", body = crate::error::ErrorResponse)
    )
)]
pub async fn recent_books(
    State(state): State<AppState>,
    Params(params): Params<RecentBooksParams>,
) -> AppResult<Json<BookListResponse>> {
    let books = state.services.catalog.recent_books(&params).await?;
    Ok(Json(books))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = BookDetail),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<BookDetail>> {
    let id = id
        .parse::<i64>()
        .map_err(|_| AppError::NotFound(format!("Book with id {} not found", id)))?;

    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(book))
}
