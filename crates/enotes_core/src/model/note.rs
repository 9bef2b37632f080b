//! Note domain model.
//!
//! # Responsibility
//! - Define the record persisted in the note blob.
//! - Own content normalization shared by create and edit paths.
//!
//! # Invariants
//! - `id` and `created_at` never change after creation.
//! - `content` is trimmed and non-empty for every note built here.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Character budget of list previews.
pub const DEFAULT_PREVIEW_CHARS: usize = 50;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Stable note identifier, ordered by creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(i64);

impl NoteId {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl Display for NoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validation failures for note content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteValidationError {
    /// Content is empty or whitespace-only after trimming.
    EmptyContent,
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyContent => write!(f, "note content cannot be empty"),
        }
    }
}

impl Error for NoteValidationError {}

/// Trims raw user input and rejects blank content.
pub fn normalize_content(raw: &str) -> Result<String, NoteValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(NoteValidationError::EmptyContent);
    }
    Ok(trimmed.to_string())
}

/// A single user-authored text entry.
///
/// Serialized as `{"id": <int>, "content": <string>, "createdAt": <iso>}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    id: NoteId,
    content: String,
    #[serde(with = "crate::model::timestamp")]
    created_at: DateTime<Utc>,
}

impl Note {
    /// Builds a note from raw content, trimming it first.
    pub fn new(
        id: NoteId,
        content: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Self, NoteValidationError> {
        let content = normalize_content(content)?;
        Ok(Self::from_normalized(id, content, created_at))
    }

    pub(crate) fn from_normalized(id: NoteId, content: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            content,
            created_at,
        }
    }

    pub fn id(&self) -> NoteId {
        self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Re-applies content normalization to a note decoded from storage.
    ///
    /// Surrounding whitespace is trimmed; blank content is rejected.
    pub fn into_normalized(self) -> Result<Self, NoteValidationError> {
        let content = normalize_content(&self.content)?;
        Ok(Self { content, ..self })
    }

    /// Single-line summary for list views.
    ///
    /// Whitespace runs collapse to one space before the cut, so a multi-line
    /// note previews as one line; content still longer than `max_chars`
    /// characters is cut and suffixed with `...`. The browser widget cut the
    /// raw text with `slice(0, 50)` and left line breaks to CSS.
    pub fn preview(&self, max_chars: usize) -> Cow<'_, str> {
        let collapsed = WHITESPACE_RE.replace_all(&self.content, " ");
        if collapsed.chars().count() <= max_chars {
            return collapsed;
        }
        let mut truncated = collapsed.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        Cow::Owned(truncated)
    }

    pub(crate) fn replace_content(&mut self, content: String) {
        self.content = content;
    }
}
