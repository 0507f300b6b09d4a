//! Statistics endpoints

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{AuthorWithBooks, YearCount},
    AppState,
};

/// Catalog-wide statistics
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatsResponse {
    /// Number of books in the catalog
    pub total_books: i64,
    /// Books currently available
    pub available_books: i64,
    /// Books currently unavailable
    pub unavailable_books: i64,
    /// Distinct authors with at least one book
    pub total_authors: i64,
    /// Authors with the most books
    pub top_authors: Vec<AuthorWithBooks>,
}

/// Get catalog statistics
#[utoipa::path(
    get,
    path = "/books/stats",
    tag = "stats",
    responses(
        (status = 200, description = "Catalog statistics", body = StatsResponse)
    )
)]
pub async fn get_stats(State(state): State<AppState>) -> AppResult<Json<StatsResponse>> {
    let stats = state.services.stats.get_stats().await?;
    Ok(Json(stats))
}

/// Number of books per publication year, most recent year first
#[utoipa::path(
    get,
    path = "/books/by-year",
    tag = "stats",
    responses(
        (status = 200, description = "Books per publication year", body = Vec<YearCount>)
    )
)]
pub async fn books_by_year(State(state): State<AppState>) -> AppResult<Json<Vec<YearCount>>> {
    let years = state.services.stats.books_by_year().await?;
    Ok(Json(years))
}
