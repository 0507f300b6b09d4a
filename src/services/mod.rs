//! Business logic services

pub mod catalog;
pub mod stats;

use std::sync::Arc;

use crate::{config::PaginationConfig, error::AppResult, repository::CatalogStore};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub stats: stats::StatsService,
    store: Arc<dyn CatalogStore>,
}

impl Services {
    /// Create all services over the given store
    pub fn new(store: Arc<dyn CatalogStore>, pagination: PaginationConfig) -> Self {
        Self {
            catalog: catalog::CatalogService::new(store.clone(), pagination),
            stats: stats::StatsService::new(store.clone()),
            store,
        }
    }

    /// Check that the store answers queries
    pub async fn ping(&self) -> AppResult<()> {
        self.store.ping().await
    }
}
