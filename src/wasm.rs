use crate::bounds::BoundingBox;
use crate::octree::{DuplicatePolicy, Octree};
use crate::point::{random_points, Point};
use crate::query::{self, PointPair, QueryConfig};
use crate::wspd::Wspd;
use rand::SeedableRng;
use rand::rngs::StdRng;
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen_rayon::init_thread_pool;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn init_threads(n: usize) -> js_sys::Promise {
    init_thread_pool(n)
}

// --- Bounding Box ---

/// Represents an axis-aligned bounding box in 3D space.
///
/// Used as the sampling region of [`PointCloud3D::random_points`].
#[wasm_bindgen]
#[derive(Clone, Copy, Debug)]
pub struct BoundingBox3D {
    pub min_x: f64,
    pub min_y: f64,
    pub min_z: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub max_z: f64,
}

#[wasm_bindgen]
impl BoundingBox3D {
    #[wasm_bindgen(constructor)]
    pub fn new(
        min_x: f64,
        min_y: f64,
        min_z: f64,
        max_x: f64,
        max_y: f64,
        max_z: f64,
    ) -> BoundingBox3D {
        BoundingBox3D {
            min_x,
            min_y,
            min_z,
            max_x,
            max_y,
            max_z,
        }
    }
}

impl From<BoundingBox3D> for BoundingBox<3> {
    fn from(b: BoundingBox3D) -> Self {
        Self {
            min: [b.min_x, b.min_y, b.min_z],
            max: [b.max_x, b.max_y, b.max_z],
        }
    }
}

// --- Point cloud ---

/// A point cloud answering closest and farthest pair queries from JavaScript.
///
/// Points are passed and returned as flat `[x0, y0, z0, x1, y1, z1, ...]` arrays.
#[wasm_bindgen]
pub struct PointCloud3D {
    points: Vec<Point>,
    config: QueryConfig,
}

#[wasm_bindgen]
impl PointCloud3D {
    #[wasm_bindgen(constructor)]
    pub fn new() -> PointCloud3D {
        PointCloud3D {
            points: Vec::new(),
            config: QueryConfig::default(),
        }
    }

    /// Replaces the cloud; a trailing partial triple is ignored.
    pub fn set_points(&mut self, coords: &[f64]) {
        self.points = coords
            .chunks_exact(3)
            .map(|c| Point::new(c[0], c[1], c[2]))
            .collect();
    }

    pub fn random_points(&mut self, count: usize, bounds: BoundingBox3D) {
        let mut rng = StdRng::seed_from_u64(get_seed());
        self.points = random_points(count, &bounds.into(), &mut rng);
    }

    #[wasm_bindgen(getter)]
    pub fn points(&self) -> Vec<f64> {
        self.points.iter().flat_map(|p| p.to_array()).collect()
    }

    #[wasm_bindgen(getter)]
    pub fn count(&self) -> usize {
        self.points.len()
    }

    /// Merge coincident points instead of rejecting them.
    pub fn set_merge_duplicates(&mut self, merge: bool) {
        let policy = if merge { DuplicatePolicy::Merge } else { DuplicatePolicy::Reject };
        self.config.octree = self.config.octree.with_duplicates(policy);
    }

    pub fn set_max_depth(&mut self, max_depth: u32) {
        self.config.octree = self.config.octree.with_max_depth(max_depth);
    }

    pub fn closest_pair(&self) -> Result<Vec<f64>, JsValue> {
        query::find_closest_pair_with(&self.points, &self.config)
            .map(|pair| self.flatten(pair))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn farthest_pair(&self, epsilon: f64) -> Result<Vec<f64>, JsValue> {
        query::find_farthest_pair_with(&self.points, epsilon, &self.config)
            .map(|pair| self.flatten(pair))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn brute_force_closest_pair(&self) -> Result<Vec<f64>, JsValue> {
        query::brute_force_closest_pair(&self.points)
            .map(|pair| self.flatten(pair))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Number of pairs in the decomposition of the cloud for separation `s`.
    pub fn decomposition_size(&self, s: f64) -> Result<usize, JsValue> {
        let octree = Octree::build_with(&self.points, self.config.octree)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Wspd::new(&octree, s).len())
    }
}

impl PointCloud3D {
    fn flatten(&self, pair: PointPair) -> Vec<f64> {
        let (a, b) = pair.points(&self.points);
        vec![a.x, a.y, a.z, b.x, b.y, b.z, pair.distance]
    }
}

impl Default for PointCloud3D {
    fn default() -> Self {
        Self::new()
    }
}

fn get_seed() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        (js_sys::Math::random() * 4294967296.0) as u64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        123456789
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_cloud_queries() {
        let mut cloud = PointCloud3D::new();
        cloud.set_points(&[0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 10.0, 10.0, 10.0, 99.0]);
        assert_eq!(cloud.count(), 3);

        let closest = cloud.closest_pair().unwrap();
        assert_eq!(closest.len(), 7);
        assert!((closest[6] - 1.0).abs() < 1e-12);

        let farthest = cloud.farthest_pair(0.1).unwrap();
        assert!(farthest[6] >= 0.9 * 300f64.sqrt());
        assert!(cloud.decomposition_size(2.0).unwrap() >= 2);
    }

    #[test]
    fn test_point_cloud_random() {
        let mut cloud = PointCloud3D::default();
        cloud.random_points(50, BoundingBox3D::new(0.0, 0.0, 0.0, 1.0, 1.0, 1.0));
        assert_eq!(cloud.points().len(), 150);
        let fast = cloud.closest_pair().unwrap();
        let slow = cloud.brute_force_closest_pair().unwrap();
        assert!((fast[6] - slow[6]).abs() < 1e-12);
    }
}
