//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::storage::PageRow;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid table name: {0:?}")]
    InvalidTable(String),

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Storage lock poisoned")]
    Poisoned,

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for page storage backends
///
/// A table holds the pages stored under one keyword. Tables are created on
/// demand and never dropped.
pub trait PageStore {
    /// Creates `table` if it does not exist yet
    fn ensure_table(&mut self, table: &str) -> StorageResult<()>;

    /// Appends a row and returns its id
    ///
    /// The table is created first if this store has not seen it yet.
    fn insert_row(&mut self, table: &str, url: &str, data: &str) -> StorageResult<i64>;

    /// Counts the rows of `table`
    fn count_rows(&self, table: &str) -> StorageResult<u64>;

    /// Returns every row of `table` in insertion order
    fn fetch_rows(&self, table: &str) -> StorageResult<Vec<PageRow>>;

    /// Returns true if `table` exists
    fn table_exists(&self, table: &str) -> StorageResult<bool>;

    /// Releases the underlying connection
    fn close(self) -> StorageResult<()>
    where
        Self: Sized;
}
