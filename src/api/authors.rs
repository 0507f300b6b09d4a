//! Author endpoints

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    api::Params,
    error::AppResult,
    models::{AuthorWithBooks, PopularAuthor},
    query::{AuthorListParams, PageMeta},
    AppState,
};

/// Paginated list of authors
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthorListResponse {
    #[serde(flatten)]
    pub pagination: PageMeta,
    pub results: Vec<AuthorWithBooks>,
}

/// List authors ordered by name
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    params(
        ("search" = Option<String>, Query, description = "Name contains (case-insensitive)"),
        ("min_books" = Option<i64>, Query, description = "Only authors with at least this many books"),
        ("page" = Option<i64>, Query, description = "Page number (default: 1)"),
        ("page_size" = Option<i64>, Query, description = "Authors per page (default: 10, max: 100)")
    ),
    responses(
        (status = 200, description = "Page of authors", body = AuthorListResponse),
        (status = 400, description = "Invalid filter value", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_authors(
    State(state): State<AppState>,
    Params(params): Params<AuthorListParams>,
) -> AppResult<Json<AuthorListResponse>> {
    let authors = state.services.catalog.list_authors(&params).await?;
    Ok(Json(authors))
}

/// Authors ranked by number of available books
#[utoipa::path(
    get,
    path = "/authors/popular",
    tag = "authors",
    responses(
        (status = 200, description = "Authors with at least one available book", body = Vec<PopularAuthor>)
    )
)]
pub async fn popular_authors(State(state): State<AppState>) -> AppResult<Json<Vec<PopularAuthor>>> {
    let authors = state.services.catalog.popular_authors().await?;
    Ok(Json(authors))
}
