//! Page-number pagination: request normalization, offset windows and
//! navigation metadata.

use serde::Serialize;
use utoipa::ToSchema;

use crate::config::PaginationConfig;

/// Offset/limit slice of an ordered result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: i64,
    pub limit: i64,
}

/// A normalized page request.
///
/// `page` is at least 1 and `page_size` lies in `1..=max_page_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
}

impl PageRequest {
    /// Normalize a page request: pages below 1 become page 1, sizes below 1
    /// fall back to the default and sizes above the maximum are clamped.
    pub fn new(page: i64, page_size: i64, config: &PaginationConfig) -> Self {
        let page_size = if page_size < 1 {
            config.default_page_size
        } else {
            page_size
        };

        Self {
            page: page.max(1),
            page_size: page_size.min(config.max_page_size).max(1),
        }
    }

    /// Build a page request from raw query string values.
    /// Unparsable values behave as if absent.
    pub fn from_params(
        page: Option<&str>,
        page_size: Option<&str>,
        config: &PaginationConfig,
    ) -> Self {
        let page = page.and_then(|p| p.trim().parse::<i64>().ok()).unwrap_or(1);
        let page_size = page_size
            .and_then(|s| s.trim().parse::<i64>().ok())
            .unwrap_or(config.default_page_size);
        Self::new(page, page_size, config)
    }

    pub fn window(&self) -> PageWindow {
        PageWindow {
            offset: (self.page - 1).saturating_mul(self.page_size),
            limit: self.page_size,
        }
    }
}

/// Pagination metadata of a list response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PageMeta {
    /// Number of records matching the filters
    pub count: i64,
    pub total_pages: i64,
    pub current_page: i64,
    pub page_size: i64,
    /// Link to the next page, if any
    pub next: Option<String>,
    /// Link to the previous page, if any
    pub previous: Option<String>,
}

impl PageMeta {
    pub fn new(request: &PageRequest, total_count: i64, base_path: &str) -> Self {
        let total_pages = total_pages(total_count, request.page_size);
        let next = (request.page < total_pages)
            .then(|| page_link(base_path, request.page + 1, request.page_size));
        let previous =
            (request.page > 1).then(|| page_link(base_path, request.page - 1, request.page_size));

        Self {
            count: total_count,
            total_pages,
            current_page: request.page,
            page_size: request.page_size,
            next,
            previous,
        }
    }
}

/// `ceil(total_count / page_size)`, zero for an empty set
pub fn total_pages(total_count: i64, page_size: i64) -> i64 {
    if total_count <= 0 || page_size <= 0 {
        return 0;
    }
    (total_count + page_size - 1) / page_size
}

pub fn page_link(base_path: &str, page: i64, page_size: i64) -> String {
    format!("{}?page={}&page_size={}", base_path, page, page_size)
}
