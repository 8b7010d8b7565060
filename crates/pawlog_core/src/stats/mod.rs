//! Derived statistics over the entry log and the dog profile.
//!
//! # Responsibility
//! - Counts, per-day series and per-food correlation for display.
//! - Urgency-ranked care reminders.
//!
//! # Invariants
//! - Every function is pure and accepts empty input.

pub mod aggregate;
pub mod reminder;
