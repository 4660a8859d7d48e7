//! 3-D Vectors

#![allow(dead_code)]

use crate::lumen::Float;
use std::ops::{Add, AddAssign, Div, Index, Mul, Neg, Sub};

/// A 3-D vector containing `Float` values.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vector3f {
    /// X-coordinate.
    pub x: Float,

    /// Y-coordinate.
    pub y: Float,

    /// Z-coordinate.
    pub z: Float,
}

impl Vector3f {
    /// Creates a new 3-D vector.
    ///
    /// * `x` - X-coordinate.
    /// * `y` - Y-coordinate.
    /// * `z` - Z-coordinate.
    pub fn new(x: Float, y: Float, z: Float) -> Self {
        Self { x, y, z }
    }

    /// Creates a new 3-D zero vector.
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Returns the square of the vector's length.
    pub fn length_squared(&self) -> Float {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Returns the vector's length.
    pub fn length(&self) -> Float {
        self.length_squared().sqrt()
    }

    /// Returns the unit vector.
    pub fn normalize(&self) -> Self {
        *self / self.length()
    }

    /// Returns the dot product with another vector.
    ///
    /// * `other` - The other vector.
    pub fn dot(&self, other: &Self) -> Float {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Returns the cross product with another vector.
    ///
    /// * `other` - The other vector.
    pub fn cross(&self, other: &Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Returns the largest coordinate value.
    pub fn max_component(&self) -> Float {
        self.x.max(self.y).max(self.z)
    }
}

impl Add for Vector3f {
    type Output = Self;

    /// Adds the given vector and returns the result.
    ///
    /// * `other` - The vector to add.
    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl AddAssign for Vector3f {
    /// Performs the `+=` operation.
    ///
    /// * `other` - The vector to add.
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Vector3f {
    type Output = Self;

    /// Subtracts the given vector and returns the result.
    ///
    /// * `other` - The vector to subtract.
    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Mul<Float> for Vector3f {
    type Output = Self;

    /// Scales the vector.
    ///
    /// * `f` - The scaling factor.
    fn mul(self, f: Float) -> Self {
        Self::new(f * self.x, f * self.y, f * self.z)
    }
}

impl Mul<Vector3f> for Float {
    type Output = Vector3f;

    /// Scales the vector.
    ///
    /// * `v` - The vector.
    fn mul(self, v: Vector3f) -> Vector3f {
        v * self
    }
}

impl Div<Float> for Vector3f {
    type Output = Self;

    /// Scales the vector by 1/f.
    ///
    /// * `f` - The divisor.
    fn div(self, f: Float) -> Self {
        debug_assert!(f != 0.0);
        let inv = 1.0 / f;
        self * inv
    }
}

impl Neg for Vector3f {
    type Output = Self;

    /// Flips the vector's direction.
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl Index<usize> for Vector3f {
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
    fn cross_axis() {
        let x_axis = Vector3f::new(1.0, 0.0, 0.0);
        let y_axis = Vector3f::new(0.0, 1.0, 0.0);
        let z_axis = Vector3f::new(0.0, 0.0, 1.0);

        assert!(x_axis.cross(&y_axis) == z_axis);
        assert!(y_axis.cross(&z_axis) == x_axis);
        assert!(z_axis.cross(&x_axis) == y_axis);
    }

    #[test]
    fn normalize_unit_length() {
        let v = Vector3f::new(3.0, -4.0, 12.0).normalize();
        assert!((v.length() - 1.0).abs() < 1e-6);
    }
}
