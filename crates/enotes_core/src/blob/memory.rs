//! In-process blob store.

use super::{BlobError, BlobResult, BlobStore};
use std::collections::BTreeMap;

/// `BTreeMap`-backed blob store.
///
/// Writes can be switched off to exercise persistence failure paths.
#[derive(Debug, Default, Clone)]
pub struct MemoryBlobStore {
    entries: BTreeMap<String, String>,
    fail_writes: bool,
    write_count: usize,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store primed with one raw value.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut store = Self::new();
        store.entries.insert(key.into(), value.into());
        store
    }

    /// When enabled, `set` and `remove` fail with `BlobError::Unavailable`.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Number of successful `set` calls.
    pub fn write_count(&self) -> usize {
        self.write_count
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    fn ensure_writable(&self) -> BlobResult<()> {
        if self.fail_writes {
            return Err(BlobError::Unavailable("writes are disabled".to_string()));
        }
        Ok(())
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> BlobResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> BlobResult<()> {
        self.ensure_writable()?;
        self.entries.insert(key.to_string(), value.to_string());
        self.write_count += 1;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> BlobResult<bool> {
        self.ensure_writable()?;
        Ok(self.entries.remove(key).is_some())
    }
}
