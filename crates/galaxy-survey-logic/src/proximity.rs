//! Proximity join: candidates near occupied systems.
//!
//! Occupied systems form the reference set. A k-d tree over their
//! coordinates answers one radius query per candidate; candidates with no
//! reference system in range are dropped, the rest are annotated with the
//! names of the systems that reach them.

use serde::{Deserialize, Serialize};

use crate::candidates::{sort_by_priority, Prioritized};
use crate::occupation::OccupationStatus;
use crate::spatial::{KdTree, Point3};
use crate::stats::SystemStats;

/// Separator between names in the annotation column.
pub const SOURCE_SEPARATOR: &str = ", ";

/// Parameters of the proximity join.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProximityConfig {
    /// Inclusive search radius in light years.
    pub radius_ly: f64,
    /// Systems with this status make up the reference set.
    pub reference_status: OccupationStatus,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            radius_ly: 15.0,
            reference_status: OccupationStatus::Occupied,
        }
    }
}

/// A candidate with at least one reference system in range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyCandidate {
    pub system_name: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub distance_from_sol: f64,
    pub body_count: u32,
    pub landable_count: u32,
    pub ring_count: u32,
    /// Comma-and-space separated names, in reference table order.
    pub source_systems_within_15ly: String,
}

impl NearbyCandidate {
    /// Column names of the proximity output table, in field order.
    pub const COLUMNS: [&'static str; 9] = [
        "system_name",
        "x",
        "y",
        "z",
        "distance_from_sol",
        "body_count",
        "landable_count",
        "ring_count",
        "source_systems_within_15ly",
    ];

    fn from_candidate(candidate: &SystemStats, sources: String) -> Self {
        Self {
            system_name: candidate.system_name.clone(),
            x: candidate.x,
            y: candidate.y,
            z: candidate.z,
            distance_from_sol: candidate.distance_from_sol,
            body_count: candidate.body_count,
            landable_count: candidate.landable_count,
            ring_count: candidate.ring_count,
            source_systems_within_15ly: sources,
        }
    }

    /// Names in the annotation, split back apart.
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.source_systems_within_15ly
            .split(SOURCE_SEPARATOR)
            .filter(|name| !name.is_empty())
    }
}

impl Prioritized for NearbyCandidate {
    fn priority_key(&self) -> (u32, u32, u32) {
        (self.body_count, self.landable_count, self.ring_count)
    }
}

/// Spatial index over the reference subset of a stats table.
pub struct ReferenceIndex<'a> {
    systems: Vec<&'a SystemStats>,
    tree: KdTree,
}

impl<'a> ReferenceIndex<'a> {
    /// Index every row of `all_systems` whose status is `status`, keeping
    /// table order.
    pub fn build(all_systems: &'a [SystemStats], status: OccupationStatus) -> Self {
        let systems: Vec<&SystemStats> = all_systems
            .iter()
            .filter(|row| row.occupation_status == status)
            .collect();
        let points: Vec<Point3> = systems.iter().map(|row| row.position()).collect();
        Self {
            tree: KdTree::build(&points),
            systems,
        }
    }

    /// Number of reference systems.
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// Reference systems within `radius` of `center` (inclusive), in table order.
    pub fn within(&self, center: Point3, radius: f64) -> Vec<&'a SystemStats> {
        self.tree
            .within_radius(center, radius)
            .into_iter()
            .map(|i| self.systems[i])
            .collect()
    }

    /// Closest reference system and its distance.
    pub fn nearest(&self, center: Point3) -> Option<(&'a SystemStats, f64)> {
        self.tree
            .nearest(center)
            .map(|(i, distance)| (self.systems[i], distance))
    }
}

/// Join candidates against the reference set of `all_systems`.
///
/// Output keeps only candidates with at least one reference system within
/// `config.radius_ly`, sorted highest priority first.
pub fn find_nearby_with_sources(
    candidates: &[SystemStats],
    all_systems: &[SystemStats],
    config: &ProximityConfig,
) -> Vec<NearbyCandidate> {
    let index = ReferenceIndex::build(all_systems, config.reference_status);
    log::info!(
        "Indexed {} {} reference systems",
        index.len(),
        config.reference_status
    );

    let mut nearby: Vec<NearbyCandidate> = candidates
        .iter()
        .filter_map(|candidate| {
            let sources = index.within(candidate.position(), config.radius_ly);
            if sources.is_empty() {
                return None;
            }
            let names = sources
                .iter()
                .map(|row| row.system_name.as_str())
                .collect::<Vec<_>>()
                .join(SOURCE_SEPARATOR);
            Some(NearbyCandidate::from_candidate(candidate, names))
        })
        .collect();

    sort_by_priority(&mut nearby);
    nearby
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(name: &str, pos: (f64, f64, f64), status: OccupationStatus) -> SystemStats {
        stats_with_counts(name, pos, status, (40, 25, 5))
    }

    fn stats_with_counts(
        name: &str,
        pos: (f64, f64, f64),
        status: OccupationStatus,
        counts: (u32, u32, u32),
    ) -> SystemStats {
        let position = Point3::new(pos.0, pos.1, pos.2);
        SystemStats {
            system_name: name.to_string(),
            x: pos.0,
            y: pos.1,
            z: pos.2,
            distance_from_sol: crate::spatial::distance_from_sol(position),
            body_count: counts.0,
            landable_count: counts.1,
            ring_count: counts.2,
            has_station: status != OccupationStatus::Uncolonised,
            occupation_status: status,
        }
    }

    #[test]
    fn test_sol_proc_far_scenario() {
        let sol = stats("Sol", (0.0, 0.0, 0.0), OccupationStatus::Occupied);
        let proc_ = stats("Proc", (3.0, 4.0, 0.0), OccupationStatus::Uncolonised);
        let far = stats("Far", (100.0, 0.0, 0.0), OccupationStatus::Uncolonised);
        let all = vec![sol, proc_.clone(), far.clone()];

        let out = find_nearby_with_sources(&[proc_, far], &all, &ProximityConfig::default());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].system_name, "Proc");
        assert_eq!(out[0].source_systems_within_15ly, "Sol");
        assert_eq!(out[0].distance_from_sol, 5.0);
    }

    #[test]
    fn test_coincident_candidate_kept() {
        let anchor = stats("Anchor", (10.0, -4.0, 7.0), OccupationStatus::Occupied);
        let twin = stats("Twin", (10.0, -4.0, 7.0), OccupationStatus::Uncolonised);
        let out = find_nearby_with_sources(
            &[twin.clone()],
            &[anchor, twin],
            &ProximityConfig::default(),
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].source_systems_within_15ly, "Anchor");
    }

    #[test]
    fn test_radius_boundary_inclusive() {
        let anchor = stats("Anchor", (0.0, 0.0, 0.0), OccupationStatus::Occupied);
        let edge = stats("Edge", (0.0, 15.0, 0.0), OccupationStatus::Uncolonised);
        let beyond = stats("Beyond", (0.0, 0.0, 15.001), OccupationStatus::Uncolonised);
        let out = find_nearby_with_sources(
            &[edge, beyond],
            &[anchor],
            &ProximityConfig::default(),
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].system_name, "Edge");
    }

    #[test]
    fn test_only_occupied_systems_are_references() {
        let colonised = stats("Colony", (1.0, 0.0, 0.0), OccupationStatus::Colonised);
        let building = stats("Site", (2.0, 0.0, 0.0), OccupationStatus::Colonising);
        let candidate = stats("Cand", (0.0, 0.0, 0.0), OccupationStatus::Uncolonised);
        let out = find_nearby_with_sources(
            &[candidate],
            &[colonised, building],
            &ProximityConfig::default(),
        );
        assert!(out.is_empty());
    }

    #[test]
    fn test_multiple_sources_joined_in_table_order() {
        let all = vec![
            stats("Beta", (5.0, 0.0, 0.0), OccupationStatus::Occupied),
            stats("Far Away", (500.0, 0.0, 0.0), OccupationStatus::Occupied),
            stats("Alpha", (-5.0, 0.0, 0.0), OccupationStatus::Occupied),
        ];
        let candidate = stats("Mid", (0.0, 0.0, 0.0), OccupationStatus::Uncolonised);
        let out = find_nearby_with_sources(&[candidate], &all, &ProximityConfig::default());
        assert_eq!(out[0].source_systems_within_15ly, "Beta, Alpha");
        assert_eq!(out[0].sources().collect::<Vec<_>>(), vec!["Beta", "Alpha"]);
    }

    #[test]
    fn test_output_resorted_by_priority() {
        let all = vec![stats("Hub", (0.0, 0.0, 0.0), OccupationStatus::Occupied)];
        let candidates = vec![
            stats_with_counts("Small", (1.0, 0.0, 0.0), OccupationStatus::Uncolonised, (31, 21, 4)),
            stats_with_counts("Big", (2.0, 0.0, 0.0), OccupationStatus::Uncolonised, (80, 21, 4)),
            stats_with_counts("Mid", (3.0, 0.0, 0.0), OccupationStatus::Uncolonised, (31, 30, 4)),
        ];
        let out = find_nearby_with_sources(&candidates, &all, &ProximityConfig::default());
        let names: Vec<_> = out.iter().map(|r| r.system_name.as_str()).collect();
        assert_eq!(names, vec!["Big", "Mid", "Small"]);
    }

    #[test]
    fn test_empty_reference_set() {
        let candidate = stats("Alone", (0.0, 0.0, 0.0), OccupationStatus::Uncolonised);
        let index = ReferenceIndex::build(&[], OccupationStatus::Occupied);
        assert!(index.is_empty());
        assert!(index.nearest(Point3::ORIGIN).is_none());
        assert!(find_nearby_with_sources(&[candidate], &[], &ProximityConfig::default()).is_empty());
    }

    #[test]
    fn test_reference_index_nearest() {
        let all = vec![
            stats("Near", (1.0, 1.0, 1.0), OccupationStatus::Occupied),
            stats("Farther", (9.0, 9.0, 9.0), OccupationStatus::Occupied),
            stats("Ignored", (0.0, 0.0, 0.0), OccupationStatus::Uncolonised),
        ];
        let index = ReferenceIndex::build(&all, OccupationStatus::Occupied);
        assert_eq!(index.len(), 2);
        let (row, _) = index.nearest(Point3::ORIGIN).unwrap();
        assert_eq!(row.system_name, "Near");
    }

    #[test]
    fn test_custom_radius() {
        let all = vec![stats("Hub", (0.0, 0.0, 0.0), OccupationStatus::Occupied)];
        let candidate = stats("Out", (20.0, 0.0, 0.0), OccupationStatus::Uncolonised);
        let wide = ProximityConfig {
            radius_ly: 25.0,
            ..Default::default()
        };
        assert_eq!(find_nearby_with_sources(&[candidate], &all, &wide).len(), 1);
    }

    #[test]
    fn test_columns_match_serialized_fields() {
        let row = NearbyCandidate::from_candidate(
            &stats("Sol", (0.0, 0.0, 0.0), OccupationStatus::Uncolonised),
            "Hub".into(),
        );
        let value = serde_json::to_value(&row).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), NearbyCandidate::COLUMNS.len());
        for column in NearbyCandidate::COLUMNS {
            assert!(object.contains_key(column), "missing {column}");
        }
    }
}
