//! SQLite backing for the durable blob store.
//!
//! # Responsibility
//! - Open connections and bring them to the current blob schema.
//! - Verify that a caller-supplied connection carries that schema.
//!
//! # Invariants
//! - Schema version lives in `PRAGMA user_version`.
//! - The `blobs` table holds one row per key with `key`, `value` and
//!   `updated_at` (epoch milliseconds) columns.

use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

/// Table holding every persisted blob.
pub const BLOB_TABLE: &str = "blobs";
const BLOB_COLUMNS: [&str; 3] = ["key", "value", "updated_at"];

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file was written by a newer build.
    UnsupportedSchemaVersion { db_version: u32, latest_supported: u32 },
    /// The connection lacks the blob table or one of its columns.
    MissingSchema {
        table: &'static str,
        column: Option<&'static str>,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "blob database schema {db_version} is newer than supported {latest_supported}"
            ),
            Self::MissingSchema {
                table,
                column: None,
            } => write!(f, "blob database is missing table `{table}`"),
            Self::MissingSchema {
                table,
                column: Some(column),
            } => write!(f, "blob database table `{table}` is missing column `{column}`"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } | Self::MissingSchema { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Checks that `conn` exposes the blob table with all required columns.
pub fn ensure_blob_schema(conn: &Connection) -> DbResult<()> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({BLOB_TABLE});"))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<Vec<_>, _>>()?;

    if columns.is_empty() {
        return Err(DbError::MissingSchema {
            table: BLOB_TABLE,
            column: None,
        });
    }
    for required in BLOB_COLUMNS {
        if !columns.iter().any(|column| column == required) {
            return Err(DbError::MissingSchema {
                table: BLOB_TABLE,
                column: Some(required),
            });
        }
    }
    Ok(())
}
