//! Storage module for persisting crawled pages
//!
//! This module handles all database operations for the crawler:
//! - SQLite database initialization
//! - Lazy creation of one table per keyword
//! - Appending (url, body) rows for stored pages

mod schema;
mod sqlite;
mod traits;

pub use schema::quote_identifier;
pub use sqlite::SqliteStore;
pub use traits::{PageStore, StorageError, StorageResult};

use crate::SpiderError;

use std::path::Path;

/// Opens or creates a storage database
///
/// Called before any worker starts, so an unusable path surfaces as a
/// startup error rather than as failed tasks.
pub fn open_storage(path: &Path) -> Result<SqliteStore, SpiderError> {
    SqliteStore::new(path)
}

/// A stored page row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRow {
    pub id: i64,
    pub url: String,
    pub data: String,
}
