//! Ordered in-memory entry log.
//!
//! # Responsibility
//! - Own the single source of truth for logged entries.
//! - Issue unique, monotonic creation-time ids.
//!
//! # Invariants
//! - Entries stay in insertion order, oldest first.
//! - Ids are unique; a new id is always greater than every id seen so far.
//! - A failed append leaves the store unchanged.
//! - Removing an unknown id is a no-op.

use crate::model::entry::{Entry, EntryDraft, EntryId, EntryValidationError};
use crate::model::snapshot::LoadIssue;
use chrono::{DateTime, Utc};
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventStore {
    entries: Vec<Entry>,
    last_id: Option<i64>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a store from restored entries.
    ///
    /// Entries with non-finite coordinates or a repeated id are skipped and
    /// reported instead of failing the restore.
    pub fn from_entries(entries: Vec<Entry>) -> (Self, Vec<LoadIssue>) {
        let mut store = Self::new();
        let mut seen = HashSet::with_capacity(entries.len());
        let mut issues = Vec::new();

        for entry in entries {
            if let Err(err) = entry.validate() {
                issues.push(LoadIssue::RejectedEntry {
                    id: entry.id.0,
                    reason: err.to_string(),
                });
                continue;
            }
            if !seen.insert(entry.id) {
                issues.push(LoadIssue::RejectedEntry {
                    id: entry.id.0,
                    reason: "duplicate id".to_string(),
                });
                continue;
            }
            store.track_id(entry.id);
            store.entries.push(entry);
        }

        (store, issues)
    }

    /// Validates `draft` and appends it as a new entry created at `created_at`.
    ///
    /// # Errors
    /// Returns the validation error unchanged; nothing is inserted.
    pub fn append(
        &mut self,
        draft: EntryDraft,
        created_at: DateTime<Utc>,
    ) -> Result<&Entry, EntryValidationError> {
        let id = self.next_id(created_at);
        let entry = Entry::from_draft(id, draft, created_at)?;
        self.track_id(id);
        self.entries.push(entry);
        Ok(&self.entries[self.entries.len() - 1])
    }

    /// Deletes the entry with `id`, returning it when it existed.
    pub fn remove(&mut self, id: EntryId) -> Option<Entry> {
        let index = self.entries.iter().position(|entry| entry.id == id)?;
        Some(self.entries.remove(index))
    }

    /// Removes every entry and returns how many were dropped.
    ///
    /// Id monotonicity survives a clear.
    pub fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        removed
    }

    /// Full log, oldest first.
    pub fn all(&self) -> &[Entry] {
        &self.entries
    }

    pub fn get(&self, id: EntryId) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<Entry> {
        self.entries
    }

    fn next_id(&self, created_at: DateTime<Utc>) -> EntryId {
        let candidate = created_at.timestamp_millis();
        match self.last_id {
            Some(last) if candidate <= last => EntryId(last.saturating_add(1)),
            _ => EntryId(candidate),
        }
    }

    fn track_id(&mut self, id: EntryId) {
        self.last_id = Some(self.last_id.map_or(id.0, |last| last.max(id.0)));
    }
}

#[cfg(test)]
mod tests {
    use super::EventStore;
    use crate::model::entry::{Category, EntryDraft, EntryId, EntryValidationError};
    use chrono::{TimeZone, Utc};

    fn draft(category: Category) -> EntryDraft {
        EntryDraft::new(45.0, 9.0, Some(category))
    }

    #[test]
    fn ids_stay_monotonic_within_one_millisecond() {
        let mut store = EventStore::new();
        let at = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();

        let first = store.append(draft(Category::Healthy), at).unwrap().id;
        let second = store.append(draft(Category::Soft), at).unwrap().id;

        assert_eq!(first, EntryId(1_700_000_000_000));
        assert_eq!(second, EntryId(1_700_000_000_001));
    }

    #[test]
    fn ids_do_not_repeat_after_clock_moves_backwards() {
        let mut store = EventStore::new();
        let later = Utc.timestamp_millis_opt(2_000).unwrap();
        let earlier = Utc.timestamp_millis_opt(1_000).unwrap();

        let first = store.append(draft(Category::Healthy), later).unwrap().id;
        store.remove(first);
        let second = store.append(draft(Category::Healthy), earlier).unwrap().id;

        assert!(second > first);
    }

    #[test]
    fn failed_append_leaves_store_unchanged() {
        let mut store = EventStore::new();
        let at = Utc.timestamp_millis_opt(1_000).unwrap();

        let err = store
            .append(EntryDraft::new(f64::NAN, 9.0, Some(Category::Hard)), at)
            .unwrap_err();
        assert!(matches!(
            err,
            EntryValidationError::NonFiniteCoordinate { axis: "lat", .. }
        ));

        let err = store.append(EntryDraft::new(45.0, 9.0, None), at).unwrap_err();
        assert_eq!(err, EntryValidationError::MissingCategory);
        assert!(store.is_empty());
    }

    #[test]
    fn from_entries_skips_duplicate_ids() {
        let mut source = EventStore::new();
        let at = Utc.timestamp_millis_opt(5_000).unwrap();
        let entry = source.append(draft(Category::Healthy), at).unwrap().clone();

        let (restored, issues) = EventStore::from_entries(vec![entry.clone(), entry]);
        assert_eq!(restored.len(), 1);
        assert_eq!(issues.len(), 1);
    }
}
