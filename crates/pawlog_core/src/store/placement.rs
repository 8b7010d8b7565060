//! Marker de-overlap for new entries.
//!
//! # Responsibility
//! - Pick a point near the requested coordinate that does not sit on top of
//!   an existing marker.
//!
//! # Invariants
//! - Deterministic: same input, same output.
//! - Coordinates are compared as planar degrees; at marker scale the error
//!   is negligible.
//! - When every probe collides the requested point is returned unchanged.

use crate::model::entry::{Coordinate, Entry};
use std::f64::consts::PI;

/// Minimum separation in degrees (about three meters).
pub const MIN_SEPARATION_DEG: f64 = 0.000_03;
/// Probes per request, including the requested point itself.
pub const MAX_ATTEMPTS: u32 = 8;
const SPIRAL_GROWTH: f64 = 0.3;

/// Returns the first free point on an expanding spiral around `requested`.
pub fn resolve_placement(requested: Coordinate, existing: &[Entry]) -> Coordinate {
    for attempt in 0..MAX_ATTEMPTS {
        let candidate = probe(requested, attempt);
        if is_free(candidate, existing) {
            return candidate;
        }
    }
    requested
}

/// Whether no existing entry lies closer than `MIN_SEPARATION_DEG`.
pub fn is_free(candidate: Coordinate, existing: &[Entry]) -> bool {
    !existing
        .iter()
        .any(|entry| planar_distance(entry.coordinate(), candidate) < MIN_SEPARATION_DEG)
}

fn probe(requested: Coordinate, attempt: u32) -> Coordinate {
    if attempt == 0 {
        return requested;
    }
    let step = f64::from(attempt);
    let angle = step / f64::from(MAX_ATTEMPTS) * 2.0 * PI;
    let radius = MIN_SEPARATION_DEG * (1.0 + step * SPIRAL_GROWTH);
    Coordinate::new(
        requested.lat + angle.cos() * radius,
        requested.lng + angle.sin() * radius,
    )
}

fn planar_distance(a: Coordinate, b: Coordinate) -> f64 {
    (a.lat - b.lat).hypot(a.lng - b.lng)
}

#[cfg(test)]
mod tests {
    use super::{planar_distance, resolve_placement, MIN_SEPARATION_DEG};
    use crate::model::entry::{Category, Coordinate, Entry, EntryDraft, EntryId};
    use chrono::Utc;

    fn entry_at(id: i64, lat: f64, lng: f64) -> Entry {
        Entry::from_draft(
            EntryId(id),
            EntryDraft::new(lat, lng, Some(Category::Healthy)),
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn free_point_resolves_to_itself() {
        let existing = vec![entry_at(1, 45.0, 9.0)];
        let requested = Coordinate::new(45.001, 9.0);
        assert_eq!(resolve_placement(requested, &existing), requested);
    }

    #[test]
    fn occupied_point_moves_at_least_threshold_away() {
        let existing = vec![entry_at(1, 45.0, 9.0)];
        let requested = Coordinate::new(45.0, 9.0);

        let resolved = resolve_placement(requested, &existing);
        assert_ne!(resolved, requested);
        assert!(planar_distance(resolved, requested) >= MIN_SEPARATION_DEG);
    }

    #[test]
    fn first_probe_is_on_spiral_ring_one() {
        let existing = vec![entry_at(1, 0.0, 0.0)];
        let resolved = resolve_placement(Coordinate::new(0.0, 0.0), &existing);

        let expected_radius = MIN_SEPARATION_DEG * 1.3;
        let angle = std::f64::consts::PI / 4.0;
        assert!((resolved.lat - angle.cos() * expected_radius).abs() < 1e-12);
        assert!((resolved.lng - angle.sin() * expected_radius).abs() < 1e-12);
    }

    #[test]
    fn fully_surrounded_point_falls_back_to_request() {
        // Dense grid covering every probe position.
        let mut existing = Vec::new();
        let mut id = 0;
        for row in -12..=12 {
            for col in -12..=12 {
                id += 1;
                existing.push(entry_at(
                    id,
                    f64::from(row) * 0.000_01,
                    f64::from(col) * 0.000_01,
                ));
            }
        }
        let requested = Coordinate::new(0.0, 0.0);
        assert_eq!(resolve_placement(requested, &existing), requested);
    }
}
