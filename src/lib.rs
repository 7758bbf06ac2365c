//! # wspd3
//!
//! `wspd3` computes the exact closest pair and an approximate farthest pair (diameter)
//! of a 3D point cloud without comparing every pair of points. It is designed to be
//! used in Rust as well as compiled to WebAssembly (WASM).
//!
//! ## Features
//!
//! - **Octree**: Points are inserted one at a time into a cubical octree whose leaves
//!   are split until each one holds a single point.
//! - **Well-Separated Pair Decomposition**: Pairs of octree nodes are refined from
//!   (root, root) until every pair is far apart relative to its size.
//! - **Queries**: Closest pair (exact) and diameter within a factor `1 - epsilon`.
//! - **Coincident points**: Rejected with an error or merged into one leaf, see
//!   [`DuplicatePolicy`].
//!
//! ## Example
//!
//! ```
//! use wspd3::{find_closest_pair, find_farthest_pair, Point};
//!
//! let points = vec![
//!     Point::new(0.0, 0.0, 0.0),
//!     Point::new(0.0, 0.0, 1.0),
//!     Point::new(10.0, 10.0, 10.0),
//! ];
//! let (a, b) = find_closest_pair(&points).unwrap();
//! assert_eq!(a.distance(&b), 1.0);
//!
//! let (a, b) = find_farthest_pair(&points, 0.1).unwrap();
//! assert!(a.distance(&b) >= 0.9 * 300f64.sqrt());
//! ```
//!
//! ## Main Interface
//!
//! The primary entry points are [`find_closest_pair`] and [`find_farthest_pair`].
//! [`Octree`] and [`Wspd`] can be used directly for other pair queries.

mod bounds;
mod error;
mod octree;
mod point;
mod query;
mod wasm;
mod wspd;

pub use bounds::BoundingBox;
pub use bounds::MARGIN_RATIO;
pub use error::Error;
pub use error::Result;
pub use octree::octant;
pub use octree::CoincidentPoints;
pub use octree::DuplicatePolicy;
pub use octree::NodeId;
pub use octree::Octree;
pub use octree::OctreeConfig;
pub use octree::OctreeNode;
pub use octree::DEFAULT_MAX_DEPTH;
pub use point::random_points;
pub use point::Point;
pub use query::brute_force_closest_pair;
pub use query::brute_force_farthest_pair;
pub use query::closest_pair_in;
pub use query::farthest_pair_in;
pub use query::find_closest_pair;
pub use query::find_closest_pair_with;
pub use query::find_farthest_pair;
pub use query::find_farthest_pair_with;
pub use query::PointPair;
pub use query::QueryConfig;
pub use query::CLOSEST_PAIR_SEPARATION;
pub use wasm::BoundingBox3D;
pub use wasm::PointCloud3D;
pub use wspd::is_well_separated;
pub use wspd::SeparatedPair;
pub use wspd::Wspd;
