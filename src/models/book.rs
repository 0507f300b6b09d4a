//! Book model, its joined projections and wire representations.
//!
//! `Book` mirrors the `books` table and only knows its author by id. Author
//! columns are attached by the join in the query layer through
//! [`BookWithAuthor`] and [`BookDetailRow`]; nothing here loads relations.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::author::{Author, AuthorWithBooks};

/// Book entity as stored in the `books` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author_id: i64,
    pub published_date: NaiveDate,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Book row joined with the denormalized author columns used in listings
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct BookWithAuthor {
    #[sqlx(flatten)]
    pub book: Book,
    pub author_name: String,
    pub author_email: String,
}

/// Book row joined with every author column needed by the detail view
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct BookDetailRow {
    #[sqlx(flatten)]
    pub listing: BookWithAuthor,
    pub author_created_at: DateTime<Utc>,
    pub author_books_count: i64,
}

/// Total and available counts of a (filtered) book set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRow)]
pub struct BookCounts {
    pub total: i64,
    pub available: i64,
}

impl BookCounts {
    pub fn unavailable(&self) -> i64 {
        self.total - self.available
    }
}

/// Book as it appears in list responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookSummary {
    pub id: i64,
    pub title: String,
    /// Author id
    pub author: i64,
    pub author_name: String,
    pub author_email: String,
    pub published_date: NaiveDate,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BookWithAuthor> for BookSummary {
    fn from(row: BookWithAuthor) -> Self {
        let BookWithAuthor {
            book,
            author_name,
            author_email,
        } = row;
        Self {
            id: book.id,
            title: book.title,
            author: book.author_id,
            author_name,
            author_email,
            published_date: book.published_date,
            is_available: book.is_available,
            created_at: book.created_at,
            updated_at: book.updated_at,
        }
    }
}

/// Book detail with its author nested in place of the bare id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookDetail {
    pub id: i64,
    pub title: String,
    pub author: AuthorWithBooks,
    pub author_name: String,
    pub author_email: String,
    pub published_date: NaiveDate,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BookDetailRow> for BookDetail {
    fn from(row: BookDetailRow) -> Self {
        let BookWithAuthor {
            book,
            author_name,
            author_email,
        } = row.listing;
        let author = AuthorWithBooks::new(
            Author {
                id: book.author_id,
                name: author_name.clone(),
                email: author_email.clone(),
                created_at: row.author_created_at,
            },
            row.author_books_count,
        );
        Self {
            id: book.id,
            title: book.title,
            author,
            author_name,
            author_email,
            published_date: book.published_date,
            is_available: book.is_available,
            created_at: book.created_at,
            updated_at: book.updated_at,
        }
    }
}
