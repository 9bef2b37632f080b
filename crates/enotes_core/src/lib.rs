//! Core note store for E-Notes.
//! This crate owns the note collection, its invariants, and its persistence.

pub mod blob;
pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use blob::{BlobError, BlobResult, BlobStore, MemoryBlobStore, SqliteBlobStore};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, CoreConfig, LoggingConfig, StoreConfig, DEFAULT_STORAGE_KEY};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{
    normalize_content, Note, NoteId, NoteValidationError, DEFAULT_PREVIEW_CHARS,
};
pub use repo::note_repo::{LoadStats, RepoError, RepoResult};
pub use search::substring::{NoteSearch, SearchQuery};
pub use service::note_store::{
    EditOutcome, NoteStore, StoreError, StoreEvent, StoreResult, SubscriptionId,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
