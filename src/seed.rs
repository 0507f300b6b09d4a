//! Fixture loading.
//!
//! The HTTP surface is read-only; catalogs are populated from JSON fixtures
//! either at startup (`database.seed_file`) or from tests.

use std::{collections::HashSet, path::Path};

use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::{Pool, Postgres};
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Fixture book, owned by the enclosing author
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SeedBook {
    #[validate(length(min = 1, max = 200, message = "Title must be 1 to 200 characters"))]
    pub title: String,
    pub published_date: NaiveDate,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SeedAuthor {
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[serde(default)]
    pub books: Vec<SeedBook>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedData {
    pub authors: Vec<SeedAuthor>,
}

/// Ids assigned to a seeded author and its books, in fixture order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededAuthor {
    pub id: i64,
    pub book_ids: Vec<i64>,
}

fn default_available() -> bool {
    true
}

impl SeedData {
    pub fn from_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::Internal(format!("Cannot read seed file {}: {}", path.display(), e))
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> AppResult<Self> {
        serde_json::from_str(raw)
            .map_err(|e| AppError::Validation(format!("Malformed seed data: {}", e)))
    }

    /// Field rules plus email uniqueness across the fixture
    pub fn validate(&self) -> AppResult<()> {
        let mut emails = HashSet::new();
        for author in &self.authors {
            author.validate()?;
            for book in &author.books {
                book.validate()?;
            }
            if !emails.insert(author.email.to_lowercase()) {
                return Err(AppError::Validation(format!(
                    "Duplicate author email in seed data: {}",
                    author.email
                )));
            }
        }
        Ok(())
    }

    /// Insert every author and book in a single transaction.
    ///
    /// Authors whose email is already stored are skipped together with their
    /// books, so loading the same fixture again is a no-op. Only newly
    /// inserted authors are returned.
    pub async fn insert(&self, pool: &Pool<Postgres>) -> AppResult<Vec<SeededAuthor>> {
        self.validate()?;

        let mut tx = pool.begin().await?;
        let mut seeded = Vec::with_capacity(self.authors.len());

        for author in &self.authors {
            let inserted = sqlx::query_scalar::<_, i64>(
                r#"
                INSERT INTO authors (name, email) VALUES ($1, $2)
                ON CONFLICT (email) DO NOTHING
                RETURNING id
                "#,
            )
            .bind(&author.name)
            .bind(&author.email)
            .fetch_optional(&mut *tx)
            .await?;

            let Some(author_id) = inserted else {
                tracing::debug!(email = %author.email, "Author already present, skipping");
                continue;
            };

            let mut book_ids = Vec::with_capacity(author.books.len());
            for book in &author.books {
                let book_id = sqlx::query_scalar::<_, i64>(
                    r#"
                    INSERT INTO books (title, author_id, published_date, is_available)
                    VALUES ($1, $2, $3, $4)
                    RETURNING id
                    "#,
                )
                .bind(&book.title)
                .bind(author_id)
                .bind(book.published_date)
                .bind(book.is_available)
                .fetch_one(&mut *tx)
                .await?;
                book_ids.push(book_id);
            }

            seeded.push(SeededAuthor {
                id: author_id,
                book_ids,
            });
        }

        tx.commit().await?;

        tracing::info!(
            authors = seeded.len(),
            books = seeded.iter().map(|a| a.book_ids.len()).sum::<usize>(),
            "Seed data loaded"
        );

        Ok(seeded)
    }
}
