//! Read-side views over the entry log.
//!
//! # Responsibility
//! - Compute filtered, order-preserving views from filter criteria.
//!
//! # Invariants
//! - Views never mutate the underlying log.

pub mod filter;
