//! Composable book queries and their SQL rendering.
//!
//! A [`BookQuery`] is a plain value: predicates, an optional search term and a
//! sort order. Nothing touches the database until the repository runs
//! one of the builders produced here. Every builder selects from `books`
//! joined with `authors`, so author columns come back in the same round trip.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Postgres, QueryBuilder};

use super::pagination::PageWindow;

const BOOK_COLUMNS: &str = "b.id, b.title, b.author_id, b.published_date, b.is_available, \
     b.created_at, b.updated_at, a.name AS author_name, a.email AS author_email";

const BOOK_SOURCE: &str = " FROM books b INNER JOIN authors a ON a.id = b.author_id";

/// Sortable book columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    PublishedDate,
    CreatedAt,
    Title,
}

impl SortField {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "published_date" => Some(SortField::PublishedDate),
            "created_at" => Some(SortField::CreatedAt),
            "title" => Some(SortField::Title),
            _ => None,
        }
    }

    fn column(self) -> &'static str {
        match self {
            SortField::PublishedDate => "b.published_date",
            SortField::CreatedAt => "b.created_at",
            SortField::Title => "b.title",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub descending: bool,
}

/// Ordering of a book query. Always rendered with a trailing `b.id ASC`
/// so that pages never overlap when sort values tie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    keys: Vec<SortKey>,
}

impl Default for SortSpec {
    /// Newest publications first
    fn default() -> Self {
        Self {
            keys: vec![SortKey {
                field: SortField::PublishedDate,
                descending: true,
            }],
        }
    }
}

impl SortSpec {
    /// Most recently created first
    pub fn newest_created() -> Self {
        Self {
            keys: vec![SortKey {
                field: SortField::CreatedAt,
                descending: true,
            }],
        }
    }

    /// Parse an `ordering` parameter such as `-published_date,title`.
    ///
    /// Unknown fields are skipped; when nothing usable remains the default
    /// ordering is returned instead of an error.
    pub fn parse(raw: &str) -> Self {
        let mut keys: Vec<SortKey> = Vec::new();
        for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let (name, descending) = match token.strip_prefix('-') {
                Some(name) => (name, true),
                None => (token, false),
            };
            let Some(field) = SortField::from_name(name) else {
                continue;
            };
            if keys.iter().all(|k| k.field != field) {
                keys.push(SortKey { field, descending });
            }
        }

        if keys.is_empty() {
            Self::default()
        } else {
            Self { keys }
        }
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    fn push_sql(&self, qb: &mut QueryBuilder<'static, Postgres>) {
        qb.push(" ORDER BY ");
        for key in &self.keys {
            qb.push(key.field.column())
                .push(if key.descending { " DESC, " } else { " ASC, " });
        }
        qb.push("b.id ASC");
    }
}

/// A single condition narrowing a book query
#[derive(Debug, Clone, PartialEq)]
pub enum BookPredicate {
    AuthorId(i64),
    Availability(bool),
    AuthorNameContains(String),
    PublishedOnOrAfter(NaiveDate),
    PublishedOnOrBefore(NaiveDate),
    TitleContains(String),
    CreatedSince(DateTime<Utc>),
}

impl BookPredicate {
    /// Canonical position used to keep predicate lists independent of the
    /// order in which filters were applied.
    fn rank(&self) -> u8 {
        match self {
            BookPredicate::AuthorId(_) => 0,
            BookPredicate::Availability(_) => 1,
            BookPredicate::AuthorNameContains(_) => 2,
            BookPredicate::PublishedOnOrAfter(_) => 3,
            BookPredicate::PublishedOnOrBefore(_) => 4,
            BookPredicate::TitleContains(_) => 5,
            BookPredicate::CreatedSince(_) => 6,
        }
    }

    fn push_sql(&self, qb: &mut QueryBuilder<'static, Postgres>) {
        match self {
            BookPredicate::AuthorId(id) => {
                qb.push("b.author_id = ").push_bind(*id);
            }
            BookPredicate::Availability(available) => {
                qb.push("b.is_available = ").push_bind(*available);
            }
            BookPredicate::AuthorNameContains(fragment) => {
                qb.push("a.name ILIKE ").push_bind(like_pattern(fragment));
            }
            BookPredicate::PublishedOnOrAfter(date) => {
                qb.push("b.published_date >= ").push_bind(*date);
            }
            BookPredicate::PublishedOnOrBefore(date) => {
                qb.push("b.published_date <= ").push_bind(*date);
            }
            BookPredicate::TitleContains(fragment) => {
                qb.push("b.title ILIKE ").push_bind(like_pattern(fragment));
            }
            BookPredicate::CreatedSince(instant) => {
                qb.push("b.created_at >= ").push_bind(*instant);
            }
        }
    }
}

/// Composable, lazy query over books joined with their authors
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookQuery {
    predicates: Vec<BookPredicate>,
    search: Vec<String>,
    sort: SortSpec,
}

impl BookQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// AND another predicate into the query
    pub fn filter(mut self, predicate: BookPredicate) -> Self {
        self.predicates.push(predicate);
        self.predicates.sort_by_key(BookPredicate::rank);
        self
    }

    /// Match `terms` against title or author name.
    ///
    /// The input is split on whitespace and commas; every word must match
    /// either column. Blank input is ignored.
    pub fn search(mut self, terms: &str) -> Self {
        self.search = terms
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|word| !word.is_empty())
            .map(str::to_string)
            .collect();
        self
    }

    pub fn order_by(mut self, sort: SortSpec) -> Self {
        self.sort = sort;
        self
    }

    pub fn predicates(&self) -> &[BookPredicate] {
        &self.predicates
    }

    pub fn search_terms(&self) -> &[String] {
        &self.search
    }

    pub fn sort(&self) -> &SortSpec {
        &self.sort
    }

    /// One joined SELECT for the rows inside `window`
    pub fn select_sql(&self, window: PageWindow) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new("SELECT ");
        qb.push(BOOK_COLUMNS).push(BOOK_SOURCE);
        self.push_where(&mut qb);
        self.sort.push_sql(&mut qb);
        qb.push(" LIMIT ")
            .push_bind(window.limit)
            .push(" OFFSET ")
            .push_bind(window.offset);
        qb
    }

    /// Total and available counts of the filtered set, in one statement
    pub fn count_sql(&self) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new(
            "SELECT COUNT(*) AS total, COUNT(*) FILTER (WHERE b.is_available) AS available",
        );
        qb.push(BOOK_SOURCE);
        self.push_where(&mut qb);
        qb
    }

    /// Single book with every column of its author and the author's book count
    pub fn detail_sql(id: i64) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new("SELECT ");
        qb.push(BOOK_COLUMNS)
            .push(
                ", a.created_at AS author_created_at, \
                 (SELECT COUNT(*) FROM books ab WHERE ab.author_id = a.id) AS author_books_count",
            )
            .push(BOOK_SOURCE)
            .push(" WHERE b.id = ")
            .push_bind(id);
        qb
    }

    fn push_where(&self, qb: &mut QueryBuilder<'static, Postgres>) {
        let mut separator = " WHERE ";
        for predicate in &self.predicates {
            qb.push(separator);
            predicate.push_sql(qb);
            separator = " AND ";
        }

        for term in &self.search {
            let pattern = like_pattern(term);
            qb.push(separator)
                .push("(b.title ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR a.name ILIKE ")
                .push_bind(pattern)
                .push(")");
            separator = " AND ";
        }
    }
}

/// Case-insensitive substring pattern with LIKE wildcards in `fragment`
/// escaped so they match literally.
pub fn like_pattern(fragment: &str) -> String {
    let mut pattern = String::with_capacity(fragment.len() + 2);
    pattern.push('%');
    for c in fragment.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
