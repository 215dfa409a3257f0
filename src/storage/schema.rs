//! Page table schema
//!
//! Table names come from the user's keyword, so they are always quoted
//! as identifiers and never spliced in raw.

use crate::storage::traits::{StorageError, StorageResult};

/// Quotes a table name as an SQLite identifier
///
/// Embedded double quotes are doubled. Empty names and names containing NUL
/// are rejected.
pub fn quote_identifier(name: &str) -> StorageResult<String> {
    if name.is_empty() || name.contains('\0') {
        return Err(StorageError::InvalidTable(name.to_string()));
    }
    Ok(format!("\"{}\"", name.replace('"', "\"\"")))
}

/// SQL creating a page table
pub fn create_table_sql(table: &str) -> StorageResult<String> {
    Ok(format!(
        "CREATE TABLE IF NOT EXISTS {} (
            ID INTEGER PRIMARY KEY AUTOINCREMENT,
            URL TEXT,
            DATA TEXT
        )",
        quote_identifier(table)?
    ))
}

/// SQL appending one row to a page table
pub fn insert_row_sql(table: &str) -> StorageResult<String> {
    Ok(format!(
        "INSERT INTO {} (URL, DATA) VALUES (?1, ?2)",
        quote_identifier(table)?
    ))
}
