//! Tracker use-case service.
//!
//! # Responsibility
//! - Own the session state: entry log, profile, photo and history values.
//! - Run every mutation through validation, then persist the whole snapshot.
//! - Serve the derived views (dashboard, reminders, report) to callers.
//!
//! # Invariants
//! - Every successful mutation is followed by exactly one snapshot write.
//! - A failed write never rolls back in-memory state; it is surfaced as a
//!   non-fatal `PersistOutcome::Failed`.
//! - Loading never fails; unusable snapshot parts fall back to defaults.

use crate::model::entry::{
    normalize_label, Category, Coordinate, Entry, EntryDraft, EntryId, EntryValidationError, Size,
    Smell, StoolColor,
};
use crate::model::profile::Profile;
use crate::model::snapshot::{LoadIssue, Snapshot};
use crate::query::filter::{filter_entries, recent_entries, FilterCriteria, RECENT_ENTRIES_LIMIT};
use crate::report::{HealthReport, ReportError};
use crate::repo::snapshot_repo::SnapshotRepository;
use crate::stats::aggregate::{
    daily_histogram, tag_correlation, DailyBucket, Summary, TagCorrelation,
    DEFAULT_HISTOGRAM_DAYS, DEFAULT_TOP_TAGS,
};
use crate::stats::reminder::{upcoming_reminders, Reminder};
use crate::store::event_store::EventStore;
use crate::store::history::HistoryValues;
use crate::store::placement::resolve_placement;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use log::{info, warn};
use serde::Serialize;

/// Input for recording one event at the caller's current position.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordEntryRequest {
    /// Position reported by the caller; may be nudged to avoid overlap.
    pub requested: Coordinate,
    pub category: Option<Category>,
    pub size: Option<Size>,
    pub color: Option<StoolColor>,
    pub smell: Option<Smell>,
    pub food: Option<String>,
    pub hours_since_meal: Option<f64>,
    pub notes: Option<String>,
    /// Keep `notes` in the saved-notes picker.
    pub save_note: bool,
}

impl RecordEntryRequest {
    pub fn new(requested: Coordinate, category: Option<Category>) -> Self {
        Self {
            requested,
            category,
            size: None,
            color: None,
            smell: None,
            food: None,
            hours_since_meal: None,
            notes: None,
            save_note: false,
        }
    }
}

/// Result of the snapshot write that follows a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    Saved,
    /// In-memory state is kept; the message is meant for a user warning.
    Failed(String),
}

impl PersistOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved)
    }

    pub fn warning(&self) -> Option<&str> {
        match self {
            Self::Saved => None,
            Self::Failed(message) => Some(message),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedEntry {
    pub entry: Entry,
    pub persist: PersistOutcome,
}

/// Everything the main screen renders for one filter selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    /// Entries matching the criteria, oldest first.
    pub visible: Vec<Entry>,
    /// Newest matching entries, newest first.
    pub recent: Vec<Entry>,
    /// Counters over the whole log.
    pub summary: Summary,
    /// Counters over `visible` only.
    pub visible_summary: Summary,
    pub daily: Vec<DailyBucket>,
    pub foods: Vec<TagCorrelation>,
}

/// Session facade over a snapshot repository.
pub struct TrackerService<R: SnapshotRepository> {
    repo: R,
    store: EventStore,
    profile: Profile,
    dog_photo: Option<String>,
    food_history: HistoryValues,
    saved_notes: HistoryValues,
    is_first_time: bool,
}

impl<R: SnapshotRepository> TrackerService<R> {
    /// Restores the session from `repo`.
    ///
    /// Returns the service together with every problem repaired on the way.
    /// Storage errors are reported as `LoadIssue::StorageUnavailable` and the
    /// session starts empty.
    pub fn open(repo: R) -> (Self, Vec<LoadIssue>) {
        let (snapshot, mut issues) = match repo.load() {
            Ok(loaded) => (loaded.snapshot, loaded.issues),
            Err(err) => {
                warn!("event=snapshot_load module=service status=error error={err}");
                (
                    Snapshot::default(),
                    vec![LoadIssue::StorageUnavailable(err.to_string())],
                )
            }
        };

        let (store, rejected) = EventStore::from_entries(snapshot.entries);
        issues.extend(rejected);

        let service = Self {
            repo,
            store,
            profile: snapshot.profile,
            dog_photo: snapshot.dog_photo,
            food_history: HistoryValues::from_values(
                snapshot
                    .food_history
                    .iter()
                    .filter_map(|food| normalize_label(food))
                    .collect(),
            ),
            saved_notes: HistoryValues::from_values(snapshot.saved_notes),
            is_first_time: snapshot.is_first_time,
        };

        if issues.is_empty() {
            info!(
                "event=snapshot_load module=service status=ok entries={}",
                service.store.len()
            );
        } else {
            warn!(
                "event=snapshot_load module=service status=degraded entries={} issues={}",
                service.store.len(),
                issues.len()
            );
        }

        (service, issues)
    }

    /// Places, validates and appends a new entry created at `created_at`.
    ///
    /// # Errors
    /// Returns the validation error; nothing is stored or written then.
    pub fn record_entry(
        &mut self,
        request: RecordEntryRequest,
        created_at: DateTime<Utc>,
    ) -> Result<RecordedEntry, EntryValidationError> {
        let position = resolve_placement(request.requested, self.store.all());
        let draft = EntryDraft {
            lat: position.lat,
            lng: position.lng,
            category: request.category,
            size: request.size,
            color: request.color,
            smell: request.smell,
            food: request.food,
            hours_since_meal: request.hours_since_meal,
            notes: request.notes,
        };

        let entry = match self.store.append(draft, created_at) {
            Ok(entry) => entry.clone(),
            Err(err) => {
                warn!(
                    "event=entry_append module=service status=rejected error_code={}",
                    err.code()
                );
                return Err(err);
            }
        };

        if let Some(food) = entry.food.as_deref().and_then(normalize_label) {
            self.food_history.push(food);
        }
        if request.save_note {
            if let Some(notes) = entry.notes.as_deref() {
                self.saved_notes.push(notes);
            }
        }

        info!(
            "event=entry_append module=service status=ok id={} category={} total={}",
            entry.id,
            entry.category.key(),
            self.store.len()
        );
        let persist = self.persist();
        Ok(RecordedEntry { entry, persist })
    }

    /// Deletes one entry. Returns `None` when the id is unknown (no write).
    pub fn delete_entry(&mut self, id: EntryId) -> Option<PersistOutcome> {
        let Some(removed) = self.store.remove(id) else {
            info!("event=entry_delete module=service status=noop id={id}");
            return None;
        };
        info!(
            "event=entry_delete module=service status=ok id={} total={}",
            removed.id,
            self.store.len()
        );
        Some(self.persist())
    }

    /// Removes every entry. Returns `None` when the log was already empty.
    ///
    /// Confirmation is the caller's job.
    pub fn clear_entries(&mut self) -> Option<PersistOutcome> {
        if self.store.is_empty() {
            return None;
        }
        let removed = self.store.clear();
        info!("event=entry_clear module=service status=ok removed={removed}");
        Some(self.persist())
    }

    /// Replaces the profile wholesale.
    pub fn save_profile(&mut self, mut profile: Profile) -> PersistOutcome {
        profile.normalize();
        self.profile = profile;
        info!("event=profile_save module=service status=ok");
        self.persist()
    }

    /// Sets or removes the dog photo.
    pub fn set_dog_photo(&mut self, photo: Option<String>) -> PersistOutcome {
        self.dog_photo = photo.filter(|payload| !payload.trim().is_empty());
        info!(
            "event=photo_save module=service status=ok present={}",
            self.dog_photo.is_some()
        );
        self.persist()
    }

    pub fn entries(&self) -> &[Entry] {
        self.store.all()
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn dog_photo(&self) -> Option<&str> {
        self.dog_photo.as_deref()
    }

    pub fn food_history(&self) -> &HistoryValues {
        &self.food_history
    }

    pub fn saved_notes(&self) -> &HistoryValues {
        &self.saved_notes
    }

    /// True until the first snapshot write succeeds.
    pub fn is_first_time(&self) -> bool {
        self.is_first_time
    }

    /// Filtered entries in log order.
    pub fn filtered<Tz: TimeZone>(
        &self,
        criteria: &FilterCriteria,
        now: &DateTime<Tz>,
    ) -> Vec<Entry> {
        filter_entries(self.store.all(), criteria, now)
    }

    /// Computes every derived value the main screen shows.
    pub fn dashboard<Tz: TimeZone>(
        &self,
        criteria: &FilterCriteria,
        now: &DateTime<Tz>,
    ) -> DashboardView {
        let all = self.store.all();
        let visible = filter_entries(all, criteria, now);
        DashboardView {
            recent: recent_entries(&visible, RECENT_ENTRIES_LIMIT),
            summary: Summary::from_entries(all),
            visible_summary: Summary::from_entries(&visible),
            daily: daily_histogram(all, DEFAULT_HISTOGRAM_DAYS, now),
            foods: tag_correlation(all, DEFAULT_TOP_TAGS),
            visible,
        }
    }

    pub fn reminders(&self, today: NaiveDate) -> Vec<Reminder> {
        upcoming_reminders(&self.profile.care_schedule(), today)
    }

    /// Builds the export report from the full log.
    pub fn report(&self, today: NaiveDate) -> Result<HealthReport, ReportError> {
        HealthReport::build(&self.profile, self.store.all(), today)
    }

    /// Current state in persisted shape.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            entries: self.store.all().to_vec(),
            profile: self.profile.clone(),
            dog_photo: self.dog_photo.clone(),
            saved_notes: self.saved_notes.values().to_vec(),
            food_history: self.food_history.values().to_vec(),
            is_first_time: self.is_first_time,
        }
    }

    fn persist(&mut self) -> PersistOutcome {
        match self.repo.save(&self.snapshot()) {
            Ok(()) => {
                self.is_first_time = false;
                info!(
                    "event=snapshot_save module=service status=ok entries={}",
                    self.store.len()
                );
                PersistOutcome::Saved
            }
            Err(err) => {
                warn!("event=snapshot_save module=service status=error error={err}");
                PersistOutcome::Failed(err.to_string())
            }
        }
    }
}
