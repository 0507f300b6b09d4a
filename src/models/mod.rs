//! Data models for Bookshelf

pub mod author;
pub mod book;
pub mod stats;

// Re-export commonly used types
pub use author::{Author, AuthorWithBooks, PopularAuthor};
pub use book::{Book, BookCounts, BookDetail, BookDetailRow, BookSummary, BookWithAuthor};
pub use stats::{CatalogStats, CatalogTotals, YearCount};
