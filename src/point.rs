use crate::bounds::BoundingBox;
use rand::Rng;
use std::fmt;

/// An immutable point in 3D space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Coordinate along `axis` (0 = x, 1 = y, 2 = z).
    #[inline]
    pub fn coord(&self, axis: usize) -> f64 {
        match axis {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    #[inline]
    pub fn distance_sq(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance(&self, other: &Point) -> f64 {
        self.distance_sq(other).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f64; 3]> for Point {
    fn from(p: [f64; 3]) -> Self {
        Self::new(p[0], p[1], p[2])
    }
}

impl From<Point> for [f64; 3] {
    fn from(p: Point) -> Self {
        p.to_array()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Samples `count` points uniformly inside `bounds`.
pub fn random_points<R: Rng + ?Sized>(count: usize, bounds: &BoundingBox<3>, rng: &mut R) -> Vec<Point> {
    let w = bounds.max[0] - bounds.min[0];
    let h = bounds.max[1] - bounds.min[1];
    let d = bounds.max[2] - bounds.min[2];

    (0..count)
        .map(|_| {
            Point::new(
                bounds.min[0] + rng.r#gen::<f64>() * w,
                bounds.min[1] + rng.r#gen::<f64>() * h,
                bounds.min[2] + rng.r#gen::<f64>() * d,
            )
        })
        .collect()
}
