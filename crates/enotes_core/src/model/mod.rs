//! Domain model for the note collection.
//!
//! # Responsibility
//! - Define the persisted `Note` record and its validation rules.
//! - Allocate note ids that stay unique across restarts.
//!
//! # Invariants
//! - Every note carries a unique, strictly increasing `NoteId`.
//! - Persisted note content is trimmed and never empty.

pub mod id;
pub mod note;
pub mod timestamp;
