//! Case-insensitive substring search over note content.
//!
//! # Invariants
//! - An empty query matches every note.
//! - Matches are produced in collection order, with no ranking.
//! - Searching never mutates or copies the collection.

use crate::model::note::Note;
use std::iter::FusedIterator;
use std::slice;

/// Normalized search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    needle: String,
}

impl SearchQuery {
    pub fn new(text: &str) -> Self {
        Self {
            needle: text.to_lowercase(),
        }
    }

    /// Whether this query matches every note.
    pub fn matches_all(&self) -> bool {
        self.needle.is_empty()
    }

    pub fn matches(&self, note: &Note) -> bool {
        self.matches_all() || note.content().to_lowercase().contains(&self.needle)
    }
}

/// Lazy view over the notes matching a query.
#[derive(Debug, Clone)]
pub struct NoteSearch<'a> {
    notes: slice::Iter<'a, Note>,
    query: SearchQuery,
}

impl<'a> NoteSearch<'a> {
    pub fn new(notes: &'a [Note], query: &str) -> Self {
        Self {
            notes: notes.iter(),
            query: SearchQuery::new(query),
        }
    }
}

impl<'a> Iterator for NoteSearch<'a> {
    type Item = &'a Note;

    fn next(&mut self) -> Option<Self::Item> {
        let query = &self.query;
        self.notes.find(|note| query.matches(note))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.notes.len();
        if self.query.matches_all() {
            (remaining, Some(remaining))
        } else {
            (0, Some(remaining))
        }
    }
}

impl FusedIterator for NoteSearch<'_> {}
