//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validation, id allocation and persistence per operation.
//! - Keep presentation layers decoupled from storage details.

pub mod note_store;
