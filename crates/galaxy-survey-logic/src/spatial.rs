//! 3-D points and a k-d tree for exact radius queries.
//!
//! `KdTree` is built once over a fixed point set and answers "every point
//! within r of q" in roughly O(log n + k). Nodes are not allocated
//! individually: the tree is an implicit balanced layout over a single
//! permuted `Vec`, where each subrange `[lo, hi)` stores its splitting
//! point at the midpoint, points on the lower side of the split to the
//! left and points on the upper side to the right.
//!
//! ```
//! use galaxy_survey_logic::spatial::{KdTree, Point3};
//!
//! let points = [Point3::new(0.0, 0.0, 0.0), Point3::new(20.0, 0.0, 0.0)];
//! let tree = KdTree::build(&points);
//! assert_eq!(tree.within_radius(Point3::new(3.0, 4.0, 0.0), 15.0), vec![0]);
//! ```

use serde::{Deserialize, Serialize};

/// A point in galactic coordinates (light years).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Point3 {
    /// Sol sits at the origin of the galactic frame.
    pub const ORIGIN: Point3 = Point3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Coordinate along axis 0 (x), 1 (y) or 2 (z).
    fn axis(&self, axis: usize) -> f64 {
        match axis {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    fn distance_sq(&self, other: &Point3) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }
}

/// Euclidean distance between two points.
pub fn distance(a: Point3, b: Point3) -> f64 {
    a.distance_sq(&b).sqrt()
}

/// Euclidean distance from Sol.
pub fn distance_from_sol(p: Point3) -> f64 {
    distance(p, Point3::ORIGIN)
}

/// Subranges at or below this size are scanned linearly.
const LEAF_SIZE: usize = 8;

/// Static 3-D k-d tree over a slice of points.
///
/// Query results are indices into the slice the tree was built from.
#[derive(Debug, Clone)]
pub struct KdTree {
    /// (point, index into the original slice), permuted into tree order.
    entries: Vec<(Point3, usize)>,
}

impl KdTree {
    /// Build a balanced tree by recursive median split, cycling x → y → z.
    pub fn build(points: &[Point3]) -> Self {
        let mut entries: Vec<(Point3, usize)> = points.iter().copied().zip(0..).collect();
        Self::build_recursive(&mut entries, 0);
        Self { entries }
    }

    fn build_recursive(entries: &mut [(Point3, usize)], depth: usize) {
        if entries.len() <= LEAF_SIZE {
            return;
        }
        let axis = depth % 3;
        let mid = entries.len() / 2;
        entries.select_nth_unstable_by(mid, |a, b| a.0.axis(axis).total_cmp(&b.0.axis(axis)));
        let (left, rest) = entries.split_at_mut(mid);
        Self::build_recursive(left, depth + 1);
        Self::build_recursive(&mut rest[1..], depth + 1);
    }

    /// Number of indexed points.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Indices of every point whose Euclidean distance to `center` is at
    /// most `radius` (inclusive), in ascending index order.
    ///
    /// A negative or NaN radius matches nothing.
    pub fn within_radius(&self, center: Point3, radius: f64) -> Vec<usize> {
        let mut found = Vec::new();
        if radius >= 0.0 {
            self.collect_within(0, self.entries.len(), 0, &center, radius, &mut found);
        }
        found.sort_unstable();
        found
    }

    fn collect_within(
        &self,
        lo: usize,
        hi: usize,
        depth: usize,
        center: &Point3,
        radius: f64,
        found: &mut Vec<usize>,
    ) {
        if hi - lo <= LEAF_SIZE {
            for (point, index) in &self.entries[lo..hi] {
                if distance(*point, *center) <= radius {
                    found.push(*index);
                }
            }
            return;
        }

        let mid = lo + (hi - lo) / 2;
        let axis = depth % 3;
        let (split, index) = &self.entries[mid];
        if distance(*split, *center) <= radius {
            found.push(*index);
        }

        // Left holds coordinates <= split, right holds >= split.
        let offset = center.axis(axis) - split.axis(axis);
        if offset <= radius {
            self.collect_within(lo, mid, depth + 1, center, radius, found);
        }
        if offset >= -radius {
            self.collect_within(mid + 1, hi, depth + 1, center, radius, found);
        }
    }

    /// Index and distance of the point closest to `center`, or `None` if
    /// the tree is empty. Ties go to the lower index.
    pub fn nearest(&self, center: Point3) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        self.nearest_in(0, self.entries.len(), 0, &center, &mut best);
        best.map(|(index, dist_sq)| (index, dist_sq.sqrt()))
    }

    fn nearest_in(
        &self,
        lo: usize,
        hi: usize,
        depth: usize,
        center: &Point3,
        best: &mut Option<(usize, f64)>,
    ) {
        let mut offer = |index: usize, dist_sq: f64| {
            let better = match *best {
                Some((best_index, best_sq)) => {
                    dist_sq < best_sq || (dist_sq == best_sq && index < best_index)
                }
                None => true,
            };
            if better {
                *best = Some((index, dist_sq));
            }
        };

        if hi - lo <= LEAF_SIZE {
            for (point, index) in &self.entries[lo..hi] {
                offer(*index, point.distance_sq(center));
            }
            return;
        }

        let mid = lo + (hi - lo) / 2;
        let axis = depth % 3;
        let (split, index) = self.entries[mid];
        offer(index, split.distance_sq(center));

        let offset = center.axis(axis) - split.axis(axis);
        let (near, far) = if offset <= 0.0 {
            ((lo, mid), (mid + 1, hi))
        } else {
            ((mid + 1, hi), (lo, mid))
        };
        self.nearest_in(near.0, near.1, depth + 1, center, best);
        let must_visit_far = match *best {
            Some((_, best_sq)) => offset * offset <= best_sq,
            None => true,
        };
        if must_visit_far {
            self.nearest_in(far.0, far.1, depth + 1, center, best);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn brute_force_within(points: &[Point3], center: Point3, radius: f64) -> Vec<usize> {
        points
            .iter()
            .enumerate()
            .filter(|(_, p)| distance(**p, center) <= radius)
            .map(|(i, _)| i)
            .collect()
    }

    fn random_cloud(seed: u64, count: usize, extent: f64) -> Vec<Point3> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..count)
            .map(|_| {
                Point3::new(
                    rng.gen_range(-extent..extent),
                    rng.gen_range(-extent..extent),
                    rng.gen_range(-extent..extent),
                )
            })
            .collect()
    }

    #[test]
    fn test_distance_origin_is_zero() {
        assert_eq!(distance_from_sol(Point3::ORIGIN), 0.0);
    }

    #[test]
    fn test_distance_three_four_five() {
        assert_eq!(distance_from_sol(Point3::new(3.0, 4.0, 0.0)), 5.0);
        assert_eq!(
            distance(Point3::new(1.0, 1.0, 1.0), Point3::new(4.0, 1.0, 5.0)),
            5.0
        );
    }

    #[test]
    fn test_empty_tree() {
        let tree = KdTree::build(&[]);
        assert!(tree.is_empty());
        assert!(tree.within_radius(Point3::ORIGIN, 100.0).is_empty());
        assert_eq!(tree.nearest(Point3::ORIGIN), None);
    }

    #[test]
    fn test_radius_is_inclusive() {
        let points = [Point3::new(15.0, 0.0, 0.0), Point3::new(15.000001, 0.0, 0.0)];
        let tree = KdTree::build(&points);
        assert_eq!(tree.within_radius(Point3::ORIGIN, 15.0), vec![0]);
    }

    #[test]
    fn test_coincident_point_matches_at_zero_radius() {
        let points = [Point3::new(7.0, -2.0, 3.5)];
        let tree = KdTree::build(&points);
        assert_eq!(tree.within_radius(Point3::new(7.0, -2.0, 3.5), 0.0), vec![0]);
    }

    #[test]
    fn test_negative_radius_matches_nothing() {
        let tree = KdTree::build(&[Point3::ORIGIN]);
        assert!(tree.within_radius(Point3::ORIGIN, -1.0).is_empty());
        assert!(tree.within_radius(Point3::ORIGIN, f64::NAN).is_empty());
    }

    #[test]
    fn test_results_in_index_order() {
        let points: Vec<Point3> = (0..50)
            .rev()
            .map(|i| Point3::new(i as f64 * 0.1, 0.0, 0.0))
            .collect();
        let tree = KdTree::build(&points);
        let found = tree.within_radius(Point3::ORIGIN, 100.0);
        assert_eq!(found, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_duplicate_points_all_found() {
        let points = vec![Point3::new(1.0, 1.0, 1.0); 40];
        let tree = KdTree::build(&points);
        assert_eq!(tree.within_radius(Point3::new(1.0, 1.0, 1.0), 0.5).len(), 40);
    }

    #[test]
    fn test_matches_brute_force_on_random_cloud() {
        let points = random_cloud(42, 2_000, 200.0);
        let tree = KdTree::build(&points);
        let queries = random_cloud(7, 200, 220.0);
        for q in queries {
            assert_eq!(
                tree.within_radius(q, 15.0),
                brute_force_within(&points, q, 15.0)
            );
        }
    }

    #[test]
    fn test_nearest_matches_brute_force() {
        let points = random_cloud(3, 500, 50.0);
        let tree = KdTree::build(&points);
        for q in random_cloud(11, 100, 60.0) {
            let (index, dist) = tree.nearest(q).unwrap();
            let best = points
                .iter()
                .map(|p| distance(*p, q))
                .fold(f64::INFINITY, f64::min);
            assert_eq!(dist, best);
            assert_eq!(distance(points[index], q), best);
        }
    }

    proptest! {
        #[test]
        fn prop_radius_query_is_exact(
            coords in prop::collection::vec((-50.0f64..50.0, -50.0f64..50.0, -50.0f64..50.0), 0..120),
            center in (-60.0f64..60.0, -60.0f64..60.0, -60.0f64..60.0),
            radius in 0.0f64..40.0,
        ) {
            let points: Vec<Point3> = coords.into_iter().map(|(x, y, z)| Point3::new(x, y, z)).collect();
            let center = Point3::new(center.0, center.1, center.2);
            let tree = KdTree::build(&points);
            prop_assert_eq!(tree.within_radius(center, radius), brute_force_within(&points, center, radius));
        }
    }
}
