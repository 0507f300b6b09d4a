//! Request parameter resolution.
//!
//! Query strings are deserialized as raw strings and interpreted here so that
//! malformed values produce a JSON validation error naming the parameter.

use chrono::{Duration, NaiveDate, Utc};
use serde::Deserialize;

use crate::{
    config::PaginationConfig,
    error::{AppError, AppResult},
};

use super::{
    author::AuthorQuery,
    book::{BookPredicate, BookQuery, SortSpec},
    pagination::PageRequest,
};

pub const DEFAULT_RECENT_DAYS: i64 = 30;

/// Query parameters accepted by book listings. Unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookListParams {
    pub author_id: Option<String>,
    pub is_available: Option<String>,
    pub author_name: Option<String>,
    pub published_after: Option<String>,
    pub published_before: Option<String>,
    pub title_contains: Option<String>,
    pub search: Option<String>,
    pub ordering: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

impl BookListParams {
    /// Turn the filter, search and ordering parameters into a book query
    pub fn resolve(&self) -> AppResult<BookQuery> {
        let mut query = BookQuery::new();

        if let Some(raw) = non_blank(&self.author_id) {
            let id = raw.parse::<i64>().map_err(|_| {
                AppError::Validation(format!("Invalid author_id: '{}' is not an integer", raw))
            })?;
            query = query.filter(BookPredicate::AuthorId(id));
        }

        if let Some(available) = self.is_available.as_deref().and_then(parse_flag) {
            query = query.filter(BookPredicate::Availability(available));
        }

        if let Some(name) = non_blank(&self.author_name) {
            query = query.filter(BookPredicate::AuthorNameContains(name.to_string()));
        }

        if let Some(raw) = non_blank(&self.published_after) {
            let date = parse_date("published_after", raw)?;
            query = query.filter(BookPredicate::PublishedOnOrAfter(date));
        }

        if let Some(raw) = non_blank(&self.published_before) {
            let date = parse_date("published_before", raw)?;
            query = query.filter(BookPredicate::PublishedOnOrBefore(date));
        }

        if let Some(fragment) = non_blank(&self.title_contains) {
            query = query.filter(BookPredicate::TitleContains(fragment.to_string()));
        }

        if let Some(term) = &self.search {
            query = query.search(term);
        }

        if let Some(ordering) = &self.ordering {
            query = query.order_by(SortSpec::parse(ordering));
        }

        Ok(query)
    }

    pub fn page_request(&self, config: &PaginationConfig) -> PageRequest {
        PageRequest::from_params(self.page.as_deref(), self.page_size.as_deref(), config)
    }
}

/// Query parameters of the recently added books listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecentBooksParams {
    pub days: Option<String>,
    #[serde(flatten)]
    pub list: BookListParams,
}

impl RecentBooksParams {
    /// Book query restricted to books created in the last `days` days.
    /// Newest first unless an explicit ordering is given.
    pub fn resolve(&self) -> AppResult<BookQuery> {
        let days = match non_blank(&self.days) {
            None => DEFAULT_RECENT_DAYS,
            Some(raw) => match raw.parse::<i64>() {
                Ok(days) if (1..=36_500).contains(&days) => days,
                _ => {
                    return Err(AppError::Validation(format!(
                        "Invalid days: '{}' is not a positive number of days",
                        raw
                    )))
                }
            },
        };

        let mut query = self
            .list
            .resolve()?
            .filter(BookPredicate::CreatedSince(Utc::now() - Duration::days(days)));
        if self.list.ordering.is_none() {
            query = query.order_by(SortSpec::newest_created());
        }
        Ok(query)
    }
}

/// Query parameters accepted by the author listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorListParams {
    pub search: Option<String>,
    pub min_books: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

impl AuthorListParams {
    pub fn resolve(&self) -> AppResult<AuthorQuery> {
        let mut query = AuthorQuery::new();

        if let Some(term) = &self.search {
            query = query.name_contains(term);
        }

        if let Some(raw) = non_blank(&self.min_books) {
            let count = raw
                .parse::<i64>()
                .ok()
                .filter(|count| *count >= 0)
                .ok_or_else(|| {
                    AppError::Validation(format!(
                        "Invalid min_books: '{}' is not a non-negative integer",
                        raw
                    ))
                })?;
            query = query.min_books(count);
        }

        Ok(query)
    }

    pub fn page_request(&self, config: &PaginationConfig) -> PageRequest {
        PageRequest::from_params(self.page.as_deref(), self.page_size.as_deref(), config)
    }
}

/// Interpret a boolean flag: `true/1/yes` or `false/0/no`, case-insensitive.
/// Anything else means "no filter".
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn parse_date(field: &str, raw: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        AppError::Validation(format!(
            "Invalid {}: '{}' is not a date (expected YYYY-MM-DD)",
            field, raw
        ))
    })
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
