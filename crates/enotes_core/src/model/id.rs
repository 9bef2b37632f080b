//! Note id allocation.
//!
//! Ids follow creation time in epoch milliseconds but are bumped past the
//! last issued id whenever the clock does not move forward, so two notes
//! created within one millisecond (or after a clock step back) never share
//! an id.

use crate::model::note::NoteId;
use chrono::{DateTime, Utc};

/// Strictly monotonic id source for new notes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoteIdAllocator {
    last: Option<i64>,
}

impl NoteIdAllocator {
    /// Creates an allocator positioned after the largest existing id.
    pub fn seeded(existing: impl IntoIterator<Item = NoteId>) -> Self {
        Self {
            last: existing.into_iter().map(NoteId::get).max(),
        }
    }

    /// Returns the id the next allocation at `now` would produce.
    ///
    /// Returns `None` only when the id space is exhausted.
    pub fn peek_next(&self, now: DateTime<Utc>) -> Option<NoteId> {
        let candidate = now.timestamp_millis();
        match self.last {
            Some(last) if candidate <= last => last.checked_add(1).map(NoteId::new),
            _ => Some(NoteId::new(candidate)),
        }
    }

    /// Records `id` as issued.
    pub fn commit(&mut self, id: NoteId) {
        let value = id.get();
        if self.last.map_or(true, |last| value > last) {
            self.last = Some(value);
        }
    }

    /// Last issued or seeded id.
    pub fn last(&self) -> Option<NoteId> {
        self.last.map(NoteId::new)
    }
}

#[cfg(test)]
mod tests {
    use super::NoteIdAllocator;
    use crate::model::note::NoteId;
    use chrono::{DateTime, Utc};

    fn at(millis: i64) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_millis(millis).unwrap()
    }

    fn issue(ids: &mut NoteIdAllocator, millis: i64) -> NoteId {
        let id = ids.peek_next(at(millis)).unwrap();
        ids.commit(id);
        id
    }

    #[test]
    fn fresh_allocator_follows_clock_millis_when_ahead() {
        let mut ids = NoteIdAllocator::default();
        assert_eq!(issue(&mut ids, 1_000), NoteId::new(1_000));
        assert_eq!(issue(&mut ids, 5_000), NoteId::new(5_000));
        assert_eq!(ids.last(), Some(NoteId::new(5_000)));
    }

    #[test]
    fn bumps_past_last_within_same_millisecond_or_clock_step_back() {
        let mut ids = NoteIdAllocator::default();
        let first = issue(&mut ids, 1_000);
        let second = issue(&mut ids, 1_000);
        let third = issue(&mut ids, 999);
        assert!(first < second && second < third);
        assert_eq!(third, NoteId::new(1_002));
    }

    #[test]
    fn seeded_allocator_never_reissues_existing_ids() {
        let ids = NoteIdAllocator::seeded([NoteId::new(10), NoteId::new(9_000), NoteId::new(7)]);
        assert_eq!(ids.peek_next(at(100)), Some(NoteId::new(9_001)));
    }

    #[test]
    fn peek_does_not_consume() {
        let ids = NoteIdAllocator::default();
        assert_eq!(ids.peek_next(at(42)), ids.peek_next(at(42)));
        assert_eq!(ids.last(), None);
    }

    #[test]
    fn commit_ignores_ids_below_last() {
        let mut ids = NoteIdAllocator::seeded([NoteId::new(50)]);
        ids.commit(NoteId::new(20));
        assert_eq!(ids.last(), Some(NoteId::new(50)));
    }

    #[test]
    fn exhausted_id_space_yields_none() {
        let ids = NoteIdAllocator::seeded([NoteId::new(i64::MAX)]);
        assert_eq!(ids.peek_next(at(0)), None);
    }
}
