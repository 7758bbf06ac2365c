use crate::point::Point;

/// Ratio between the point range and the padding added on each side of the root cube.
pub const MARGIN_RATIO: f64 = 5.0;

/// Generic bounding box for N-dimensional space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox<const D: usize> {
    pub min: [f64; D],
    pub max: [f64; D],
}

impl<const D: usize> BoundingBox<D> {
    pub fn new(min: [f64; D], max: [f64; D]) -> Self {
        Self { min, max }
    }

    pub fn center(&self) -> [f64; D] {
        std::array::from_fn(|i| (self.min[i] + self.max[i]) / 2.0)
    }

    pub fn extent(&self) -> [f64; D] {
        std::array::from_fn(|i| self.max[i] - self.min[i])
    }

    /// Returns true if `p` lies in the open box (never on a face).
    pub fn contains_strict(&self, p: &[f64; D]) -> bool {
        (0..D).all(|i| p[i] > self.min[i] && p[i] < self.max[i])
    }
}

impl BoundingBox<3> {
    /// Per-axis bounding box of `points`, or `None` for an empty slice.
    pub fn enclosing(points: &[Point]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let mut min = [f64::INFINITY; 3];
        let mut max = [f64::NEG_INFINITY; 3];
        for p in points {
            for axis in 0..3 {
                let v = p.coord(axis);
                if v < min[axis] { min[axis] = v; }
                if v > max[axis] { max[axis] = v; }
            }
        }
        Some(Self { min, max })
    }

    /// Cube enclosing `points` strictly.
    ///
    /// The global minimum and maximum over all three axes are used for every axis,
    /// so the result is a perfect cube, then each side is padded by
    /// `range / MARGIN_RATIO`. A zero range is padded by one unit instead.
    pub fn root_cube(points: &[Point]) -> Option<Self> {
        let (center, half) = Self::root_cell(points)?;
        Some(Self {
            min: center.map(|c| c - half),
            max: center.map(|c| c + half),
        })
    }

    /// Center and half edge length of [`BoundingBox::root_cube`].
    ///
    /// Both are computed from halved coordinates so that inputs near `f64::MAX`
    /// do not overflow. The padding is capped so that every face stays finite; a
    /// point lying within one padding of `±f64::MAX` may then touch a face.
    pub fn root_cell(points: &[Point]) -> Option<([f64; 3], f64)> {
        let tight = Self::enclosing(points)?;
        let lo = tight.min.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = tight.max.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let center = lo / 2.0 + hi / 2.0;
        let half = hi / 2.0 - lo / 2.0;
        let pad = if half > 0.0 {
            (hi / MARGIN_RATIO - lo / MARGIN_RATIO)
                .min(f64::MAX - hi)
                .min(lo + f64::MAX)
        } else {
            1.0
        };
        Some(([center; 3], half + pad))
    }
}
