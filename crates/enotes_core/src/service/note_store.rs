//! Note store: the single owner of the note collection.
//!
//! # Responsibility
//! - Provide create/update/delete/search over an ordered note collection.
//! - Persist the whole collection after every mutation.
//! - Notify subscribers about committed changes.
//!
//! # Invariants
//! - Collection order is most-recently-created first.
//! - Ids are unique; `id` and `created_at` never change after creation.
//! - In-memory state only changes after the blob write succeeded.
//! - Rejected inputs and unknown ids are no-ops: nothing is written and no
//!   event is emitted.

use crate::blob::BlobStore;
use crate::clock::{Clock, SystemClock};
use crate::config::{ConfigError, StoreConfig};
use crate::model::id::NoteIdAllocator;
use crate::model::note::{normalize_content, Note, NoteId};
use crate::repo::note_repo::{LoadStats, NoteRepository, RepoError};
use crate::search::substring::NoteSearch;
use chrono::SubsecRound;
use log::{debug, error, info, warn};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::time::Instant;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failures that prevent a store operation from completing.
///
/// Validation problems and unknown ids are not errors; they are reported
/// through return values.
#[derive(Debug)]
pub enum StoreError {
    Config(ConfigError),
    Repo(RepoError),
    /// No id greater than the largest existing one can be allocated.
    IdSpaceExhausted,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::IdSpaceExhausted => write!(f, "note id space exhausted"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::IdSpaceExhausted => None,
        }
    }
}

impl From<ConfigError> for StoreError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Result of [`NoteStore::edit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    Updated(Note),
    NotFound,
    /// New content was blank after trimming; the note is unchanged.
    EmptyContent,
}

impl EditOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, Self::Updated(_))
    }
}

/// Committed change delivered to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    Created(NoteId),
    Updated(NoteId),
    Deleted(NoteId),
}

impl StoreEvent {
    pub fn note_id(&self) -> NoteId {
        match self {
            Self::Created(id) | Self::Updated(id) | Self::Deleted(id) => *id,
        }
    }

    fn op(&self) -> &'static str {
        match self {
            Self::Created(_) => "create",
            Self::Updated(_) => "update",
            Self::Deleted(_) => "delete",
        }
    }
}

/// Handle returned by [`NoteStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&StoreEvent, &[Note])>;

/// Ordered note collection synchronized with a blob store.
pub struct NoteStore<S: BlobStore> {
    repo: NoteRepository<S>,
    notes: Vec<Note>,
    ids: NoteIdAllocator,
    clock: Box<dyn Clock>,
    load_stats: LoadStats,
    listeners: BTreeMap<SubscriptionId, Listener>,
    next_subscription: u64,
}

impl<S: BlobStore> NoteStore<S> {
    /// Loads the collection stored under the default key using the wall clock.
    pub fn load(blob: S) -> StoreResult<Self> {
        Self::load_with(blob, &StoreConfig::default(), Box::new(SystemClock))
    }

    /// Loads the collection with explicit configuration and time source.
    ///
    /// Missing or malformed stored data yields an empty (or partially
    /// recovered) collection. Only blob read failures are errors.
    pub fn load_with(blob: S, config: &StoreConfig, clock: Box<dyn Clock>) -> StoreResult<Self> {
        config.validate()?;
        let started_at = Instant::now();
        let repo = NoteRepository::new(blob, config.storage_key.as_str());

        let report = repo.load_all().map_err(|err| {
            error!(
                "event=store_load module=store status=error key={} duration_ms={} error={err}",
                repo.key(),
                started_at.elapsed().as_millis()
            );
            err
        })?;

        if report.stats.recovered_from_corruption {
            warn!(
                "event=store_load module=store status=recovered key={} reason=corrupt_blob",
                repo.key()
            );
        }
        info!(
            "event=store_load module=store status=ok key={} notes={} skipped={} duration_ms={}",
            repo.key(),
            report.notes.len(),
            report.stats.skipped_records,
            started_at.elapsed().as_millis()
        );

        Ok(Self {
            ids: NoteIdAllocator::seeded(report.notes.iter().map(Note::id)),
            notes: report.notes,
            load_stats: report.stats,
            repo,
            clock,
            listeners: BTreeMap::new(),
            next_subscription: 0,
        })
    }

    /// Creates a note from `content` and puts it first in the collection.
    ///
    /// Returns `Ok(None)` without touching storage when `content` is blank.
    pub fn create(&mut self, content: &str) -> StoreResult<Option<Note>> {
        let Ok(content) = normalize_content(content) else {
            debug!("event=note_create module=store status=skipped reason=empty_content");
            return Ok(None);
        };

        let created_at = self.clock.now().trunc_subsecs(3);
        let id = self
            .ids
            .peek_next(created_at)
            .ok_or(StoreError::IdSpaceExhausted)?;
        let note = Note::from_normalized(id, content, created_at);

        let mut next = Vec::with_capacity(self.notes.len() + 1);
        next.push(note.clone());
        next.extend(self.notes.iter().cloned());
        self.commit(next, StoreEvent::Created(id))?;
        self.ids.commit(id);

        Ok(Some(note))
    }

    /// Replaces the content of note `id`.
    ///
    /// Returns `false` when the note does not exist or `content` is blank.
    pub fn update(&mut self, id: NoteId, content: &str) -> StoreResult<bool> {
        Ok(self.edit(id, content)?.is_updated())
    }

    /// Replaces the content of note `id`, reporting why nothing changed.
    pub fn edit(&mut self, id: NoteId, content: &str) -> StoreResult<EditOutcome> {
        let Some(index) = self.position(id) else {
            debug!("event=note_update module=store status=skipped reason=not_found note_id={id}");
            return Ok(EditOutcome::NotFound);
        };
        let Ok(content) = normalize_content(content) else {
            debug!(
                "event=note_update module=store status=skipped reason=empty_content note_id={id}"
            );
            return Ok(EditOutcome::EmptyContent);
        };

        let mut next = self.notes.clone();
        next[index].replace_content(content);
        let updated = next[index].clone();
        self.commit(next, StoreEvent::Updated(id))?;

        Ok(EditOutcome::Updated(updated))
    }

    /// Removes note `id`. Returns whether a note was removed.
    pub fn delete(&mut self, id: NoteId) -> StoreResult<bool> {
        let Some(index) = self.position(id) else {
            debug!("event=note_delete module=store status=skipped reason=not_found note_id={id}");
            return Ok(false);
        };

        let mut next = self.notes.clone();
        next.remove(index);
        self.commit(next, StoreEvent::Deleted(id))?;

        Ok(true)
    }

    /// Lazily yields notes whose content contains `query`, ignoring case.
    pub fn search(&self, query: &str) -> NoteSearch<'_> {
        NoteSearch::new(&self.notes, query)
    }

    pub fn get(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| note.id() == id)
    }

    /// Full collection, most recently created first.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Diagnostics from the startup load.
    pub fn load_stats(&self) -> LoadStats {
        self.load_stats
    }

    pub fn storage_key(&self) -> &str {
        self.repo.key()
    }

    pub fn blob_store(&self) -> &S {
        self.repo.blob()
    }

    pub fn into_blob_store(self) -> S {
        self.repo.into_blob()
    }

    /// Registers a listener called after every committed mutation.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&StoreEvent, &[Note]) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.insert(id, Box::new(listener));
        id
    }

    /// Removes a listener. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    fn position(&self, id: NoteId) -> Option<usize> {
        self.notes.iter().position(|note| note.id() == id)
    }

    fn commit(&mut self, next: Vec<Note>, event: StoreEvent) -> StoreResult<()> {
        if let Err(err) = self.repo.save_all(&next) {
            error!(
                "event=store_persist module=store status=error op={} note_id={} error={err}",
                event.op(),
                event.note_id()
            );
            return Err(err.into());
        }

        self.notes = next;
        info!(
            "event=store_persist module=store status=ok op={} note_id={} notes={}",
            event.op(),
            event.note_id(),
            self.notes.len()
        );

        for listener in self.listeners.values_mut() {
            listener(&event, &self.notes);
        }
        Ok(())
    }
}

impl<S: BlobStore> Debug for NoteStore<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoteStore")
            .field("storage_key", &self.repo.key())
            .field("notes", &self.notes.len())
            .field("last_id", &self.ids.last())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
