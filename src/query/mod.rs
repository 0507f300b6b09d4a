//! Query construction for the catalog: filter resolution, SQL builders for
//! books and authors, and pagination arithmetic.

pub mod author;
pub mod book;
pub mod filters;
pub mod pagination;

pub use author::AuthorQuery;
pub use book::{BookPredicate, BookQuery, SortField, SortKey, SortSpec};
pub use filters::{AuthorListParams, BookListParams, RecentBooksParams};
pub use pagination::{PageMeta, PageRequest, PageWindow};
