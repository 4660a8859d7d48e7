//! 3-D Points

#![allow(dead_code)]

use super::Vector3f;
use crate::lumen::Float;
use std::ops::{Add, Index, Mul, Sub};

/// A 3-D point containing `Float` values.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point3f {
    /// X-coordinate.
    pub x: Float,

    /// Y-coordinate.
    pub y: Float,

    /// Z-coordinate.
    pub z: Float,
}

impl Point3f {
    /// Creates a new 3-D point.
    ///
    /// * `x` - X-coordinate.
    /// * `y` - Y-coordinate.
    /// * `z` - Z-coordinate.
    pub fn new(x: Float, y: Float, z: Float) -> Self {
        Self { x, y, z }
    }

    /// Creates a new 3-D point at the origin.
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Returns the square of the distance to another point.
    ///
    /// * `other` - The other point.
    pub fn distance_squared(&self, other: Self) -> Float {
        (*self - other).length_squared()
    }

    /// Returns the component-wise minimum with another point.
    ///
    /// * `other` - The other point.
    pub fn min(&self, other: Self) -> Self {
        Self::new(
            self.x.min(other.x),
            self.y.min(other.y),
            self.z.min(other.z),
        )
    }

    /// Returns the component-wise maximum with another point.
    ///
    /// * `other` - The other point.
    pub fn max(&self, other: Self) -> Self {
        Self::new(
            self.x.max(other.x),
            self.y.max(other.y),
            self.z.max(other.z),
        )
    }
}

impl Add<Vector3f> for Point3f {
    type Output = Self;

    /// Offsets the point by the given vector.
    ///
    /// * `v` - The vector.
    fn add(self, v: Vector3f) -> Self {
        Self::new(self.x + v.x, self.y + v.y, self.z + v.z)
    }
}

impl Add for Point3f {
    type Output = Self;

    /// Adds the coordinates of another point. Useful for weighted sums.
    ///
    /// * `other` - The other point.
    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Sub<Vector3f> for Point3f {
    type Output = Self;

    /// Offsets the point by the negated vector.
    ///
    /// * `v` - The vector.
    fn sub(self, v: Vector3f) -> Self {
        Self::new(self.x - v.x, self.y - v.y, self.z - v.z)
    }
}

impl Sub for Point3f {
    type Output = Vector3f;

    /// Returns the vector pointing from the given point to this point.
    ///
    /// * `other` - The other point.
    fn sub(self, other: Self) -> Vector3f {
        Vector3f::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Mul<Float> for Point3f {
    type Output = Self;

    /// Scales the coordinates. Useful for weighted sums.
    ///
    /// * `f` - The scaling factor.
    fn mul(self, f: Float) -> Self {
        Self::new(f * self.x, f * self.y, f * self.z)
    }
}

impl Index<usize> for Point3f {
    type Output = Float;

    /// Indexes the coordinates by axis (0 = x, 1 = y, 2 = z).
    ///
    /// * `axis` - The axis.
    fn index(&self, axis: usize) -> &Self::Output {
        match axis {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("invalid axis value"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_squared_matches_difference_vector() {
        let p = Point3f::new(1.0, 2.0, 3.0);
        let q = Point3f::new(4.0, 6.0, 3.0);
        assert_eq!(p.distance_squared(q), 25.0);
        assert_eq!((p - q).length(), 5.0);
    }
}
