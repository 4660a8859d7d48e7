//! 3-D Axis Aligned Bounding Boxes.

#![allow(dead_code)]

use super::{Point3f, Vector3f};
use crate::lumen::Float;

/// 3-D Axis Aligned Bounding Box containing `Float` points.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Bounds3f {
    /// Minimum bounds.
    pub p_min: Point3f,

    /// Maximum bounds.
    pub p_max: Point3f,
}

impl Bounds3f {
    /// Creates a new 3-D bounding box from 2 points. The minimum and maximum
    /// bounds are used for each coordinate axis.
    ///
    /// * `p1` - First point.
    /// * `p2` - Second point.
    pub fn new(p1: Point3f, p2: Point3f) -> Self {
        Self {
            p_min: p1.min(p2),
            p_max: p1.max(p2),
        }
    }

    /// Returns a 3-D bounding box where minimum and maximum bounds are maximum
    /// and minimum values respectively of the type's limits. This is so we can
    /// easily grow the bounding box from nothing iteratively.
    pub fn empty() -> Self {
        Self {
            p_min: Point3f::new(Float::MAX, Float::MAX, Float::MAX),
            p_max: Point3f::new(Float::MIN, Float::MIN, Float::MIN),
        }
    }

    /// Returns the union with another bounding box.
    ///
    /// * `other` - The other bounding box.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            p_min: self.p_min.min(other.p_min),
            p_max: self.p_max.max(other.p_max),
        }
    }

    /// Returns the union with a point.
    ///
    /// * `p` - The point.
    pub fn union_point(&self, p: Point3f) -> Self {
        Self {
            p_min: self.p_min.min(p),
            p_max: self.p_max.max(p),
        }
    }

    /// Returns the vector along the box diagonal from the minimum point to
    /// the maximum point.
    pub fn diagonal(&self) -> Vector3f {
        self.p_max - self.p_min
    }

    /// Returns the center of the bounding box.
    pub fn centroid(&self) -> Point3f {
        self.p_min * 0.5 + self.p_max * 0.5
    }

    /// Returns the surface area of the bounding box.
    pub fn surface_area(&self) -> Float {
        let d = self.diagonal();
        2.0 * (d.x * d.y + d.y * d.z + d.z * d.x)
    }
}

impl From<Point3f> for Bounds3f {
    /// Uses a 3-D point as minimum and maximum 3-D bounds.
    ///
    /// * `p` - 3-D point.
    fn from(p: Point3f) -> Self {
        Self { p_min: p, p_max: p }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_grows_from_nothing() {
        let b = Bounds3f::empty()
            .union_point(Point3f::new(1.0, -2.0, 0.5))
            .union_point(Point3f::new(-1.0, 3.0, 0.0));
        assert_eq!(b.p_min, Point3f::new(-1.0, -2.0, 0.0));
        assert_eq!(b.p_max, Point3f::new(1.0, 3.0, 0.5));
    }

    #[test]
    fn surface_area_and_centroid() {
        let b = Bounds3f::new(Point3f::zero(), Point3f::new(2.0, 3.0, 4.0));
        assert_eq!(b.surface_area(), 2.0 * (6.0 + 12.0 + 8.0));
        assert_eq!(b.centroid(), Point3f::new(1.0, 1.5, 2.0));
    }

    #[test]
    fn union_encloses_both() {
        let a = Bounds3f::new(Point3f::zero(), Point3f::new(1.0, 1.0, 1.0));
        let b = Bounds3f::new(Point3f::new(2.0, -1.0, 0.0), Point3f::new(3.0, 0.5, 2.0));
        let u = a.union(&b);
        assert_eq!(u.p_min, Point3f::new(0.0, -1.0, 0.0));
        assert_eq!(u.p_max, Point3f::new(3.0, 1.0, 2.0));
    }
}
