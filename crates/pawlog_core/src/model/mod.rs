//! Domain model for the dog health log.
//!
//! # Responsibility
//! - Define canonical records shared by store, derived views and persistence.
//! - Keep the wire shape of the persisted snapshot stable.
//!
//! # Invariants
//! - Every entry is identified by a unique, monotonic `EntryId`.
//! - Entries are immutable once created; deletion is the only lifecycle step.

pub mod entry;
mod lenient;
pub mod profile;
pub mod snapshot;
