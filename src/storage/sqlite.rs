//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the PageStore trait.

use crate::storage::schema::{create_table_sql, insert_row_sql, quote_identifier};
use crate::storage::traits::{PageStore, StorageError, StorageResult};
use crate::storage::PageRow;
use crate::SpiderError;
use rusqlite::{params, Connection};
use std::collections::HashSet;
use std::path::Path;

/// SQLite storage backend
///
/// One connection is shared by all workers behind a mutex; it remembers
/// which tables it already created so the DDL runs once per table per run.
pub struct SqliteStore {
    conn: Connection,
    ensured: HashSet<String>,
}

impl SqliteStore {
    /// Opens or creates the database file at `path`
    pub fn new(path: &Path) -> Result<Self, SpiderError> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        Ok(Self {
            conn,
            ensured: HashSet::new(),
        })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> Result<Self, SpiderError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn,
            ensured: HashSet::new(),
        })
    }

    fn require_table(&self, table: &str) -> StorageResult<()> {
        if self.table_exists(table)? {
            Ok(())
        } else {
            Err(StorageError::TableNotFound(table.to_string()))
        }
    }
}

impl PageStore for SqliteStore {
    fn ensure_table(&mut self, table: &str) -> StorageResult<()> {
        if self.ensured.contains(table) {
            return Ok(());
        }

        self.conn.execute(&create_table_sql(table)?, [])?;
        self.ensured.insert(table.to_string());
        tracing::debug!("Ensured table {}", table);
        Ok(())
    }

    fn insert_row(&mut self, table: &str, url: &str, data: &str) -> StorageResult<i64> {
        self.ensure_table(table)?;
        self.conn.execute(&insert_row_sql(table)?, params![url, data])?;
        Ok(self.conn.last_insert_rowid())
    }

    fn count_rows(&self, table: &str) -> StorageResult<u64> {
        self.require_table(table)?;
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", quote_identifier(table)?),
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn fetch_rows(&self, table: &str) -> StorageResult<Vec<PageRow>> {
        self.require_table(table)?;
        let mut stmt = self.conn.prepare(&format!(
            "SELECT ID, URL, DATA FROM {} ORDER BY ID",
            quote_identifier(table)?
        ))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(PageRow {
                    id: row.get(0)?,
                    url: row.get(1)?,
                    data: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    fn table_exists(&self, table: &str) -> StorageResult<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            params![table],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn close(self) -> StorageResult<()> {
        self.conn.close().map_err(|(_, e)| StorageError::Sqlite(e))
    }
}
