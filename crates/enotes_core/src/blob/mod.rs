//! Key-value blob storage used to persist the note collection.
//!
//! # Responsibility
//! - Define the storage contract the note store writes through.
//! - Provide in-process and SQLite-backed implementations.
//!
//! # Invariants
//! - `set` replaces the whole value stored under a key.
//! - A successful `set` is visible to every later `get` on the same store.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
mod sqlite;

pub use memory::MemoryBlobStore;
pub use sqlite::SqliteBlobStore;

pub type BlobResult<T> = Result<T, BlobError>;

/// Storage-layer failure.
#[derive(Debug)]
pub enum BlobError {
    Db(DbError),
    /// Backend refused the operation.
    Unavailable(String),
}

impl Display for BlobError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(message) => write!(f, "blob store unavailable: {message}"),
        }
    }
}

impl Error for BlobError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for BlobError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for BlobError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable key-value store holding serialized blobs.
pub trait BlobStore {
    /// Returns the value stored under `key`, or `None` when absent.
    fn get(&self, key: &str) -> BlobResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> BlobResult<()>;

    /// Removes `key`. Returns whether a value was present.
    fn remove(&mut self, key: &str) -> BlobResult<bool>;
}
