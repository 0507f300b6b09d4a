//! Author model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Author entity as stored in the `authors` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Author with the number of books they own.
///
/// This is the wire shape of an author everywhere it is serialized: author
/// listings, top authors in statistics and the nested author of a book detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AuthorWithBooks {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub books_count: i64,
    pub created_at: DateTime<Utc>,
}

impl AuthorWithBooks {
    pub fn new(author: Author, books_count: i64) -> Self {
        Self {
            id: author.id,
            name: author.name,
            email: author.email,
            books_count,
            created_at: author.created_at,
        }
    }
}

/// Author ranked by how many of their books are currently available
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PopularAuthor {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub available_books_count: i64,
    pub created_at: DateTime<Utc>,
}
