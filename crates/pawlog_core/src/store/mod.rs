//! In-process state owned by the control thread.
//!
//! # Responsibility
//! - Hold the ordered entry log and the append-only history values.
//! - Resolve non-overlapping marker placement for new entries.
//!
//! # Invariants
//! - The entry log is mutated only by append, remove and clear.
//! - History values only grow.

pub mod event_store;
pub mod history;
pub mod placement;
