//! Core domain logic for pawlog, a dog health log.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod report;
pub mod repo;
pub mod service;
pub mod stats;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::entry::{
    normalize_label, Category, Coordinate, Entry, EntryDraft, EntryId, EntryValidationError, Size,
    Smell, StoolColor,
};
pub use model::profile::{CareSchedule, Gender, Profile};
pub use model::snapshot::{LoadIssue, Snapshot, SnapshotLoad};
pub use query::filter::{filter_entries, recent_entries, CategoryFilter, FilterCriteria, Period};
pub use report::{HealthReport, ReportError};
pub use repo::snapshot_repo::{
    RepoError, RepoResult, SnapshotRepository, SqliteSnapshotRepository, SNAPSHOT_KEY,
};
pub use service::tracker_service::{
    DashboardView, PersistOutcome, RecordEntryRequest, RecordedEntry, TrackerService,
};
pub use stats::aggregate::{daily_histogram, tag_correlation, DailyBucket, Summary, TagCorrelation};
pub use stats::reminder::{upcoming_reminders, CareKind, Reminder, Urgency};
pub use store::event_store::EventStore;
pub use store::history::HistoryValues;
pub use store::placement::resolve_placement;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
