//! SQLite-backed blob store.
//!
//! # Invariants
//! - Each key maps to exactly one row in `blobs`.
//! - `set` is a single upsert statement, so a reader never sees a partial value.

use super::{BlobResult, BlobStore};
use crate::db::{ensure_blob_schema, open_db, open_db_in_memory, DbResult};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Durable key-value table stored in SQLite.
#[derive(Debug)]
pub struct SqliteBlobStore {
    conn: Connection,
}

impl SqliteBlobStore {
    /// Opens (or creates) a database file and migrates it.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }

    /// Wraps an already migrated connection.
    pub fn try_new(conn: Connection) -> BlobResult<Self> {
        ensure_blob_schema(&conn)?;
        Ok(Self { conn })
    }
}

impl BlobStore for SqliteBlobStore {
    fn get(&self, key: &str) -> BlobResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM blobs WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> BlobResult<()> {
        self.conn.execute(
            "INSERT INTO blobs (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        debug!(
            "event=blob_write module=blob status=ok backend=sqlite key={key} bytes={}",
            value.len()
        );
        Ok(())
    }

    fn remove(&mut self, key: &str) -> BlobResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM blobs WHERE key = ?1;", [key])?;
        Ok(changed > 0)
    }
}
