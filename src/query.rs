use crate::error::{Error, Result};
use crate::octree::{Octree, OctreeConfig};
use crate::point::Point;
use crate::wspd::Wspd;
use rayon::prelude::*;
use tracing::debug;

/// Separation used for the closest pair. Any `s >= 2` guarantees the closest
/// pair shows up as a pair of two leaves.
pub const CLOSEST_PAIR_SEPARATION: f64 = 2.0;

/// Two input points, by index, and the distance between them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointPair {
    pub first: usize,
    pub second: usize,
    pub distance: f64,
}

impl PointPair {
    pub fn between(points: &[Point], first: usize, second: usize) -> Self {
        Self {
            first,
            second,
            distance: points[first].distance(&points[second]),
        }
    }

    pub fn points(&self, points: &[Point]) -> (Point, Point) {
        (points[self.first], points[self.second])
    }
}

/// Parameters shared by the pair queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QueryConfig {
    pub octree: OctreeConfig,
    pub closest_separation: f64,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            octree: OctreeConfig::default(),
            closest_separation: CLOSEST_PAIR_SEPARATION,
        }
    }
}

fn require_pairs(points: &[Point]) -> Result<()> {
    if points.len() < 2 {
        return Err(Error::InsufficientPoints {
            required: 2,
            found: points.len(),
        });
    }
    Ok(())
}

/// Exact closest pair of `points`.
pub fn find_closest_pair(points: &[Point]) -> Result<(Point, Point)> {
    let pair = find_closest_pair_with(points, &QueryConfig::default())?;
    Ok(pair.points(points))
}

/// Exact closest pair of `points`, by index.
///
/// Under [`DuplicatePolicy::Merge`](crate::DuplicatePolicy::Merge) the points
/// sharing a leaf are compared with each other and with the points of every
/// leaf paired against theirs, so a merged pair is only returned when it is
/// the closest one, with its real distance.
pub fn find_closest_pair_with(points: &[Point], config: &QueryConfig) -> Result<PointPair> {
    require_pairs(points)?;
    let tree = Octree::build_with(points, config.octree)?;
    if !tree.coincident().is_empty() {
        debug!(merged = tree.coincident().len(), "leaves holding merged points");
    }

    let wspd = Wspd::new(&tree, config.closest_separation);
    let best = closest_pair_in(&wspd).unwrap_or_else(|| PointPair::between(points, 0, 1));
    debug!(first = best.first, second = best.second, distance = best.distance, "closest pair");
    Ok(best)
}

/// Closest pair among the decomposition's pairs of two leaves, and among the
/// points of any leaf holding more than one.
pub fn closest_pair_in(wspd: &Wspd<'_>) -> Option<PointPair> {
    let tree = wspd.tree();
    let points = tree.points();

    let across = wspd
        .iter()
        .filter(|pair| tree.node(pair.first).is_leaf() && tree.node(pair.second).is_leaf())
        .flat_map(|pair| {
            let a = tree.node(pair.first).current_points();
            let b = tree.node(pair.second).current_points();
            a.iter()
                .flat_map(move |&i| b.iter().map(move |&j| PointPair::between(points, i, j)))
        });

    let within = tree.leaves().flat_map(|id| {
        let held = tree.node(id).current_points();
        held.iter().enumerate().flat_map(move |(k, &i)| {
            held.iter().skip(k + 1).map(move |&j| PointPair::between(points, i, j))
        })
    });

    across.chain(within).min_by(|a, b| a.distance.total_cmp(&b.distance))
}

/// A pair of `points` whose distance is at least `(1 - epsilon)` times the diameter.
pub fn find_farthest_pair(points: &[Point], epsilon: f64) -> Result<(Point, Point)> {
    let pair = find_farthest_pair_with(points, epsilon, &QueryConfig::default())?;
    Ok(pair.points(points))
}

/// Approximate farthest pair of `points`, by index.
///
/// The decomposition is built with `s = 4 / epsilon`; each pair contributes the
/// distance between the first points routed into its two nodes.
pub fn find_farthest_pair_with(points: &[Point], epsilon: f64, config: &QueryConfig) -> Result<PointPair> {
    require_pairs(points)?;
    if !(epsilon > 0.0 && epsilon < 1.0) {
        return Err(Error::InvalidEpsilon(epsilon));
    }
    let tree = Octree::build_with(points, config.octree)?;

    let wspd = Wspd::new(&tree, 4.0 / epsilon);
    let best = farthest_pair_in(&wspd).unwrap_or_else(|| PointPair::between(points, 0, 1));
    debug!(first = best.first, second = best.second, distance = best.distance, epsilon, "farthest pair");
    Ok(best)
}

/// Farthest pair among the representatives of the decomposition's pairs.
pub fn farthest_pair_in(wspd: &Wspd<'_>) -> Option<PointPair> {
    let tree = wspd.tree();
    wspd.iter()
        .map(|pair| {
            let a = tree.node(pair.first).representative();
            let b = tree.node(pair.second).representative();
            PointPair::between(tree.points(), a, b)
        })
        .max_by(|a, b| a.distance.total_cmp(&b.distance))
}

/// Closest pair by comparing all pairs of points.
pub fn brute_force_closest_pair(points: &[Point]) -> Result<PointPair> {
    brute_force(points, |a, b| b.distance.total_cmp(&a.distance))
}

/// Farthest pair by comparing all pairs of points.
pub fn brute_force_farthest_pair(points: &[Point]) -> Result<PointPair> {
    brute_force(points, |a, b| a.distance.total_cmp(&b.distance))
}

/// Parallel scan of all index pairs, keeping the maximum under `better`.
fn brute_force<F>(points: &[Point], better: F) -> Result<PointPair>
where
    F: Fn(&PointPair, &PointPair) -> std::cmp::Ordering + Sync + Send,
{
    require_pairs(points)?;
    let n = points.len();
    (0..n - 1)
        .into_par_iter()
        .filter_map(|i| {
            ((i + 1)..n)
                .map(|j| PointPair::between(points, i, j))
                .max_by(|a, b| better(a, b))
        })
        .max_by(|a, b| better(a, b))
        .ok_or(Error::InsufficientPoints { required: 2, found: n })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::octree::DuplicatePolicy;

    fn cube_corners() -> Vec<Point> {
        let mut points = Vec::new();
        for x in [0.0, 1.0] {
            for y in [0.0, 1.0] {
                for z in [0.0, 1.0] {
                    points.push(Point::new(x, y, z));
                }
            }
        }
        points
    }

    #[test]
    fn test_closest_pair_example() {
        let points = vec![
            Point::new(0.0, 0.0, 0.0),
            Point::new(0.0, 0.0, 1.0),
            Point::new(10.0, 10.0, 10.0),
        ];
        let (a, b) = find_closest_pair(&points).unwrap();
        assert!((a.distance(&b) - 1.0).abs() < 1e-12);
        let mut found = [a, b];
        found.sort_by(|p, q| p.z.total_cmp(&q.z));
        assert_eq!(found, [points[0], points[1]]);
    }

    #[test]
    fn test_farthest_pair_cube_corners() {
        let points = cube_corners();
        let (a, b) = find_farthest_pair(&points, 0.1).unwrap();
        let d = a.distance(&b);
        assert!(d >= 0.9 * 3f64.sqrt(), "distance {} too short", d);
        assert!(d <= 3f64.sqrt() + 1e-12);
    }

    #[test]
    fn test_too_few_points() {
        let one = [Point::new(1.0, 1.0, 1.0)];
        for points in [&one[..0], &one[..]] {
            let expected = Error::InsufficientPoints { required: 2, found: points.len() };
            assert_eq!(find_closest_pair(points).err(), Some(expected.clone()));
            assert_eq!(find_farthest_pair(points, 0.5).err(), Some(expected.clone()));
            assert_eq!(brute_force_closest_pair(points).err(), Some(expected));
        }
    }

    #[test]
    fn test_epsilon_out_of_range() {
        let points = cube_corners();
        for eps in [0.0, 1.0, -0.5, 2.0, f64::NAN] {
            assert!(matches!(find_farthest_pair(&points, eps), Err(Error::InvalidEpsilon(_))));
        }
    }

    #[test]
    fn test_coincident_points() {
        let points = vec![
            Point::new(0.0, 0.0, 0.0),
            Point::new(5.0, 5.0, 5.0),
            Point::new(5.0, 5.0, 5.0),
        ];
        assert!(matches!(
            find_closest_pair(&points),
            Err(Error::DegenerateGeometry { first: 1, second: 2, .. })
        ));

        let config = QueryConfig {
            octree: OctreeConfig::default().with_duplicates(DuplicatePolicy::Merge),
            ..QueryConfig::default()
        };
        let closest = find_closest_pair_with(&points, &config).unwrap();
        assert_eq!((closest.first, closest.second, closest.distance), (1, 2, 0.0));

        let farthest = find_farthest_pair_with(&points, 0.1, &config).unwrap();
        assert!((farthest.distance - 75f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_all_points_coincident_merged() {
        let points = vec![Point::new(2.0, 2.0, 2.0); 4];
        let config = QueryConfig {
            octree: OctreeConfig::default().with_duplicates(DuplicatePolicy::Merge),
            ..QueryConfig::default()
        };
        let farthest = find_farthest_pair_with(&points, 0.5, &config).unwrap();
        assert_eq!(farthest.distance, 0.0);
    }

    #[test]
    fn test_brute_force_baselines() {
        let points = cube_corners();
        assert!((brute_force_closest_pair(&points).unwrap().distance - 1.0).abs() < 1e-12);
        assert!((brute_force_farthest_pair(&points).unwrap().distance - 3f64.sqrt()).abs() < 1e-12);
    }
}
