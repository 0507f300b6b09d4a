//! Aggregate rows produced by the statistics queries

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::author::AuthorWithBooks;

/// Whole-table book counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRow)]
pub struct CatalogTotals {
    pub total_books: i64,
    pub available_books: i64,
    /// Distinct authors referenced by at least one book
    pub total_authors: i64,
}

/// Totals and leaderboard read from one snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogStats {
    pub totals: CatalogTotals,
    pub top_authors: Vec<AuthorWithBooks>,
}

/// Number of books published in a given year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct YearCount {
    pub year: i32,
    pub count: i64,
}
