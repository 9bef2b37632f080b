//! Persistence of the note collection.
//!
//! # Responsibility
//! - Encode/decode the whole note collection to one blob value.
//! - Isolate blob store details from store orchestration.
//!
//! # Invariants
//! - Writes always replace the full collection under one storage key.
//! - Reads never fail on malformed blobs; they recover to what is decodable.

pub mod note_repo;
