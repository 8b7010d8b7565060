//! Persistence adapter contracts and implementations.
//!
//! # Responsibility
//! - Define the whole-snapshot load/save contract used by the service layer.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - The snapshot is written and read as one object; there are no partial
//!   writes.

pub mod snapshot_repo;
