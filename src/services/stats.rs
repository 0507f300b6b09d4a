//! Statistics service

use std::sync::Arc;

use crate::{
    api::stats::StatsResponse, error::AppResult, models::YearCount, repository::CatalogStore,
};

/// Size of the top authors leaderboard
pub const TOP_AUTHORS: i64 = 5;

#[derive(Clone)]
pub struct StatsService {
    store: Arc<dyn CatalogStore>,
}

impl StatsService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Whole-catalog counters and top authors.
    /// Totals are global: list filters never apply here.
    pub async fn get_stats(&self) -> AppResult<StatsResponse> {
        let stats = self.store.catalog_stats(TOP_AUTHORS).await?;
        let totals = stats.totals;

        Ok(StatsResponse {
            total_books: totals.total_books,
            available_books: totals.available_books,
            unavailable_books: totals.total_books - totals.available_books,
            total_authors: totals.total_authors,
            top_authors: stats.top_authors,
        })
    }

    pub async fn books_by_year(&self) -> AppResult<Vec<YearCount>> {
        self.store.books_by_year().await
    }
}
