//! Author listing queries. Book counts are aggregated in the same statement.

use sqlx::{Postgres, QueryBuilder};

use super::book::like_pattern;
use super::pagination::PageWindow;

const AUTHOR_BOOKS_SOURCE: &str = " FROM authors a LEFT JOIN books b ON b.author_id = a.id";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorQuery {
    name_contains: Option<String>,
    min_books: Option<i64>,
}

impl AuthorQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name_contains(mut self, fragment: &str) -> Self {
        let fragment = fragment.trim();
        if !fragment.is_empty() {
            self.name_contains = Some(fragment.to_string());
        }
        self
    }

    /// Keep only authors owning at least `count` books
    pub fn min_books(mut self, count: i64) -> Self {
        self.min_books = Some(count);
        self
    }

    #[cfg(test)]
    pub fn min_books_filter(&self) -> Option<i64> {
        self.min_books
    }

    /// Authors ordered by name, each with their book count
    pub fn select_sql(&self, window: PageWindow) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new(
            "SELECT a.id, a.name, a.email, COUNT(b.id) AS books_count, a.created_at",
        );
        self.push_grouped(&mut qb);
        qb.push(" ORDER BY a.name ASC, a.id ASC LIMIT ")
            .push_bind(window.limit)
            .push(" OFFSET ")
            .push_bind(window.offset);
        qb
    }

    pub fn count_sql(&self) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM (SELECT a.id");
        self.push_grouped(&mut qb);
        qb.push(") AS matched");
        qb
    }

    /// Authors with the most books; ties keep id order
    pub fn top_by_books_sql(limit: i64) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new(
            "SELECT a.id, a.name, a.email, COUNT(b.id) AS books_count, a.created_at",
        );
        qb.push(AUTHOR_BOOKS_SOURCE)
            .push(" GROUP BY a.id ORDER BY books_count DESC, a.id ASC LIMIT ")
            .push_bind(limit);
        qb
    }

    /// Authors with at least one available book, most available first
    pub fn popular_sql() -> QueryBuilder<'static, Postgres> {
        QueryBuilder::new(
            "SELECT a.id, a.name, a.email, COUNT(b.id) AS available_books_count, a.created_at \
             FROM authors a INNER JOIN books b ON b.author_id = a.id AND b.is_available \
             GROUP BY a.id ORDER BY available_books_count DESC, a.id ASC",
        )
    }

    fn push_grouped(&self, qb: &mut QueryBuilder<'static, Postgres>) {
        qb.push(AUTHOR_BOOKS_SOURCE);
        if let Some(fragment) = &self.name_contains {
            qb.push(" WHERE a.name ILIKE ").push_bind(like_pattern(fragment));
        }
        qb.push(" GROUP BY a.id");
        if let Some(count) = self.min_books {
            qb.push(" HAVING COUNT(b.id) >= ").push_bind(count);
        }
    }
}
