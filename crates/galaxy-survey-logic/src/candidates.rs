//! Colonisation candidate selection.
//!
//! A candidate is an uncolonised system close to Sol with plenty of bodies,
//! landable bodies and rings. Survivors are ordered most promising first.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::occupation::OccupationStatus;
use crate::stats::SystemStats;

/// Thresholds a system must meet to become a candidate. Counts are strict
/// lower bounds, distance is an inclusive upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub required_status: OccupationStatus,
    pub max_distance_from_sol: f64,
    pub bodies_above: u32,
    pub landables_above: u32,
    pub rings_above: u32,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            required_status: OccupationStatus::Uncolonised,
            max_distance_from_sol: 500.0,
            bodies_above: 30,
            landables_above: 20,
            rings_above: 3,
        }
    }
}

impl FilterCriteria {
    pub fn matches(&self, row: &SystemStats) -> bool {
        row.occupation_status == self.required_status
            && row.distance_from_sol <= self.max_distance_from_sol
            && row.body_count > self.bodies_above
            && row.landable_count > self.landables_above
            && row.ring_count > self.rings_above
    }
}

/// Rows that can be ordered by (body count, landable count, ring count).
pub trait Prioritized {
    fn priority_key(&self) -> (u32, u32, u32);
}

impl Prioritized for SystemStats {
    fn priority_key(&self) -> (u32, u32, u32) {
        (self.body_count, self.landable_count, self.ring_count)
    }
}

/// Descending priority comparison.
pub fn by_priority<T: Prioritized>(a: &T, b: &T) -> Ordering {
    b.priority_key().cmp(&a.priority_key())
}

/// Stable sort, highest priority first. Exact ties keep input order.
pub fn sort_by_priority<T: Prioritized>(rows: &mut [T]) {
    rows.sort_by(by_priority);
}

/// Keep rows matching `criteria`, highest priority first.
pub fn filter_candidates(rows: Vec<SystemStats>, criteria: &FilterCriteria) -> Vec<SystemStats> {
    let mut candidates: Vec<SystemStats> = rows
        .into_iter()
        .filter(|row| criteria.matches(row))
        .collect();
    sort_by_priority(&mut candidates);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn row(
        name: &str,
        status: OccupationStatus,
        distance: f64,
        counts: (u32, u32, u32),
    ) -> SystemStats {
        SystemStats {
            system_name: name.to_string(),
            x: distance,
            y: 0.0,
            z: 0.0,
            distance_from_sol: distance,
            body_count: counts.0,
            landable_count: counts.1,
            ring_count: counts.2,
            has_station: status != OccupationStatus::Uncolonised,
            occupation_status: status,
        }
    }

    fn names(rows: &[SystemStats]) -> Vec<&str> {
        rows.iter().map(|r| r.system_name.as_str()).collect()
    }

    #[test]
    fn test_thresholds_are_strict_counts_inclusive_distance() {
        let criteria = FilterCriteria::default();
        let ok = row("Ok", OccupationStatus::Uncolonised, 500.0, (31, 21, 4));
        assert!(criteria.matches(&ok));

        let far = row("Far", OccupationStatus::Uncolonised, 500.01, (31, 21, 4));
        let few_bodies = row("Bodies", OccupationStatus::Uncolonised, 10.0, (30, 21, 4));
        let few_landable = row("Landable", OccupationStatus::Uncolonised, 10.0, (31, 20, 4));
        let few_rings = row("Rings", OccupationStatus::Uncolonised, 10.0, (31, 21, 3));
        let taken = row("Taken", OccupationStatus::Colonising, 10.0, (31, 21, 4));
        for r in [far, few_bodies, few_landable, few_rings, taken] {
            assert!(!criteria.matches(&r), "{} should be rejected", r.system_name);
        }
    }

    #[test]
    fn test_sorted_descending_by_key() {
        let rows = vec![
            row("A", OccupationStatus::Uncolonised, 10.0, (40, 25, 5)),
            row("B", OccupationStatus::Uncolonised, 10.0, (50, 21, 4)),
            row("C", OccupationStatus::Uncolonised, 10.0, (40, 30, 4)),
            row("D", OccupationStatus::Uncolonised, 10.0, (40, 25, 9)),
            row("E", OccupationStatus::Occupied, 10.0, (90, 90, 90)),
        ];
        let out = filter_candidates(rows, &FilterCriteria::default());
        assert_eq!(names(&out), vec!["B", "C", "D", "A"]);
    }

    #[test]
    fn test_exact_ties_keep_input_order() {
        let rows = vec![
            row("First", OccupationStatus::Uncolonised, 10.0, (40, 25, 5)),
            row("Second", OccupationStatus::Uncolonised, 20.0, (40, 25, 5)),
        ];
        let out = filter_candidates(rows, &FilterCriteria::default());
        assert_eq!(names(&out), vec!["First", "Second"]);
    }

    #[test]
    fn test_nan_distance_rejected() {
        let r = row("Lost", OccupationStatus::Uncolonised, f64::NAN, (31, 21, 4));
        assert!(!FilterCriteria::default().matches(&r));
    }

    fn arb_row() -> impl Strategy<Value = SystemStats> {
        (
            prop::sample::select(OccupationStatus::ALL.to_vec()),
            0.0f64..1000.0,
            0u32..60,
            0u32..40,
            0u32..8,
        )
            .prop_map(|(status, distance, bodies, landable, rings)| {
                row("P", status, distance, (bodies, landable, rings))
            })
    }

    proptest! {
        #[test]
        fn prop_output_sorted_and_filtered(rows in prop::collection::vec(arb_row(), 0..200)) {
            let criteria = FilterCriteria::default();
            let out = filter_candidates(rows, &criteria);
            for pair in out.windows(2) {
                prop_assert!(pair[0].priority_key() >= pair[1].priority_key());
            }
            for r in &out {
                prop_assert!(r.distance_from_sol <= 500.0);
                prop_assert!(r.body_count > 30 && r.landable_count > 20 && r.ring_count > 3);
                prop_assert_eq!(r.occupation_status, OccupationStatus::Uncolonised);
            }
        }

        #[test]
        fn prop_filter_is_idempotent(rows in prop::collection::vec(arb_row(), 0..200)) {
            let criteria = FilterCriteria::default();
            let once = filter_candidates(rows, &criteria);
            let twice = filter_candidates(once.clone(), &criteria);
            prop_assert_eq!(once, twice);
        }
    }
}
