//! Note collection repository over a `BlobStore`.
//!
//! # Responsibility
//! - Serialize the ordered note collection as a JSON array.
//! - Recover from malformed or partially malformed blobs at load time.
//!
//! # Invariants
//! - Stored order is preserved on load.
//! - Loaded notes have unique ids below `i64::MAX` and trimmed, non-empty
//!   content.

use crate::blob::{BlobError, BlobStore};
use crate::model::note::{Note, NoteId};
use log::warn;
use serde_json::Value;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for collection persistence.
#[derive(Debug)]
pub enum RepoError {
    Blob(BlobError),
    Encode(serde_json::Error),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blob(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode note collection: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Blob(err) => Some(err),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<BlobError> for RepoError {
    fn from(value: BlobError) -> Self {
        Self::Blob(value)
    }
}

/// Diagnostics collected while decoding a stored collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Records dropped because they failed to decode or broke an invariant.
    pub skipped_records: usize,
    /// The blob was unreadable as a whole and the collection started empty.
    pub recovered_from_corruption: bool,
}

/// Decoded collection plus load diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub notes: Vec<Note>,
    pub stats: LoadStats,
}

impl LoadReport {
    fn corrupt() -> Self {
        Self {
            notes: Vec::new(),
            stats: LoadStats {
                skipped_records: 0,
                recovered_from_corruption: true,
            },
        }
    }
}

/// Binds a blob store to the key holding the note collection.
#[derive(Debug)]
pub struct NoteRepository<S: BlobStore> {
    blob: S,
    key: String,
}

impl<S: BlobStore> NoteRepository<S> {
    pub fn new(blob: S, key: impl Into<String>) -> Self {
        Self {
            blob,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn blob(&self) -> &S {
        &self.blob
    }

    pub fn into_blob(self) -> S {
        self.blob
    }

    /// Reads and decodes the stored collection.
    ///
    /// A missing key yields an empty collection. Malformed data is recovered
    /// from, never reported as an error; only blob transport failures are.
    pub fn load_all(&self) -> RepoResult<LoadReport> {
        match self.blob.get(&self.key)? {
            Some(raw) => Ok(decode_collection(&raw)),
            None => Ok(LoadReport::default()),
        }
    }

    /// Overwrites the stored collection with `notes`.
    pub fn save_all(&mut self, notes: &[Note]) -> RepoResult<()> {
        let encoded = serde_json::to_string(notes).map_err(RepoError::Encode)?;
        self.blob.set(&self.key, &encoded)?;
        Ok(())
    }
}

/// Decodes a raw collection blob, skipping records that cannot be trusted.
pub fn decode_collection(raw: &str) -> LoadReport {
    let value = match serde_json::from_str::<Value>(raw) {
        Ok(value) => value,
        Err(err) => {
            warn!(
                "event=collection_decode module=repo status=recovered reason=invalid_json bytes={} error={err}",
                raw.len()
            );
            return LoadReport::corrupt();
        }
    };

    let records = match value {
        Value::Array(records) => records,
        Value::Null => return LoadReport::default(),
        other => {
            warn!(
                "event=collection_decode module=repo status=recovered reason=not_an_array kind={}",
                json_kind(&other)
            );
            return LoadReport::corrupt();
        }
    };

    let mut seen = HashSet::<NoteId>::with_capacity(records.len());
    let mut report = LoadReport {
        notes: Vec::with_capacity(records.len()),
        stats: LoadStats::default(),
    };

    for (index, record) in records.into_iter().enumerate() {
        let note = match serde_json::from_value::<Note>(record) {
            Ok(note) => note,
            Err(err) => {
                warn!("event=record_decode module=repo status=skipped index={index} error={err}");
                report.stats.skipped_records += 1;
                continue;
            }
        };
        let note_id = note.id();
        // The allocator issues ids above the largest loaded one.
        if note_id.get().checked_add(1).is_none() {
            warn!(
                "event=record_decode module=repo status=skipped index={index} note_id={note_id} error=id_out_of_range"
            );
            report.stats.skipped_records += 1;
            continue;
        }
        let note = match note.into_normalized() {
            Ok(note) => note,
            Err(err) => {
                warn!(
                    "event=record_decode module=repo status=skipped index={index} note_id={note_id} error={err}"
                );
                report.stats.skipped_records += 1;
                continue;
            }
        };
        if !seen.insert(note.id()) {
            warn!(
                "event=record_decode module=repo status=skipped index={index} note_id={} error=duplicate_id",
                note.id()
            );
            report.stats.skipped_records += 1;
            continue;
        }
        report.notes.push(note);
    }

    report
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
