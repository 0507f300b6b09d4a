//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{authors, books, health, stats};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bookshelf API",
        version = "1.0.0",
        description = "Read-only catalog of authors and books"
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Books
        books::list_books,
        books::recent_books,
        books::get_book,
        // Authors
        authors::list_authors,
        authors::popular_authors,
        // Stats
        stats::get_stats,
        stats::books_by_year,
    ),
    components(
        schemas(
            // Books
            books::BookListResponse,
            books::BookListMeta,
            crate::models::book::BookSummary,
            crate::models::book::BookDetail,
            crate::query::pagination::PageMeta,
            // Authors
            authors::AuthorListResponse,
            crate::models::author::AuthorWithBooks,
            crate::models::author::PopularAuthor,
            // Stats
            stats::StatsResponse,
            crate::models::stats::YearCount,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Book catalog"),
        (name = "authors", description = "Authors"),
        (name = "stats", description = "Statistics")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
