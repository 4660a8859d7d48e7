//! Orientation cones bounding emission directions.

#![allow(dead_code)]

use super::Vector3f;
use crate::lumen::{clamp, min, Float, PI};

/// A directional bound: every emission direction of a light cluster lies
/// within `acos(cos_theta)` radians of `axis`. `cos_theta` of 1 bounds a
/// single direction, -1 the full sphere.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Cone {
    /// Central direction (unit length).
    pub axis: Vector3f,

    /// Cosine of the cone's half-angle.
    pub cos_theta: Float,
}

impl Cone {
    /// Creates a new orientation cone.
    ///
    /// * `axis`      - Central direction (unit length).
    /// * `cos_theta` - Cosine of the half-angle.
    pub fn new(axis: Vector3f, cos_theta: Float) -> Self {
        Self { axis, cos_theta }
    }

    /// Returns the cone covering every direction. Used as the sentinel for
    /// omnidirectional and infinite emitters.
    pub fn full_sphere() -> Self {
        Self::new(Vector3f::new(0.0, 0.0, 1.0), -1.0)
    }

    /// Returns the directional union: the smallest cone containing both
    /// input cones.
    ///
    /// * `other` - The other cone.
    pub fn merge(self, other: Self) -> Self {
        // Order the pair so `a` has the larger half-angle.
        let (a, b) = if self.cos_theta <= other.cos_theta {
            (self, other)
        } else {
            (other, self)
        };

        let theta_a = clamp(a.cos_theta, -1.0, 1.0).acos();
        let theta_b = clamp(b.cos_theta, -1.0, 1.0).acos();
        let theta_d = clamp(a.axis.dot(&b.axis), -1.0, 1.0).acos();

        // The wider cone already contains the narrower one.
        if min(theta_d + theta_b, PI) <= theta_a {
            return a;
        }

        let theta_o = 0.5 * (theta_a + theta_d + theta_b);
        if theta_o >= PI {
            return Self::full_sphere();
        }

        // Rotate a's axis halfway towards b's.
        let theta_r = theta_o - theta_a;
        let rotation = a.axis.cross(&b.axis);
        if rotation.length_squared() < 1e-12 {
            // Antipodal or identical axes leave no unique rotation plane.
            return Self::new(a.axis, theta_o.cos());
        }

        let axis = rotate_around(a.axis, rotation.normalize(), theta_r);
        Self::new(axis, theta_o.cos())
    }
}

impl Default for Cone {
    fn default() -> Self {
        Self::full_sphere()
    }
}

/// Rotates `v` by `angle` radians around the unit vector `k` using the
/// Rodrigues formula.
///
/// * `v`     - The vector to rotate.
/// * `k`     - The rotation axis (unit length).
/// * `angle` - The rotation angle in radians.
fn rotate_around(v: Vector3f, k: Vector3f, angle: Float) -> Vector3f {
    let (sin, cos) = angle.sin_cos();
    v * cos + k.cross(&v) * sin + k * (k.dot(&v) * (1.0 - cos))
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    fn contains(outer: &Cone, inner: &Cone) -> bool {
        let theta_o = clamp(outer.cos_theta, -1.0, 1.0).acos();
        let theta_i = clamp(inner.cos_theta, -1.0, 1.0).acos();
        let theta_d = clamp(outer.axis.dot(&inner.axis), -1.0, 1.0).acos();
        theta_d + theta_i <= theta_o + 1e-4
    }

    #[test]
    fn merge_is_contained_union() {
        let a = Cone::new(Vector3f::new(1.0, 0.0, 0.0), (0.3 as Float).cos());
        let b = Cone::new(Vector3f::new(0.0, 1.0, 0.0), (0.5 as Float).cos());
        let u = a.merge(b);
        assert!(contains(&u, &a));
        assert!(contains(&u, &b));
    }

    #[test]
    fn merge_nested_returns_wider() {
        let narrow = Cone::new(Vector3f::new(0.0, 0.0, 1.0), (0.1 as Float).cos());
        let wide = Cone::new(Vector3f::new(0.0, 0.0, 1.0), (1.0 as Float).cos());
        let u = narrow.merge(wide);
        assert!(approx_eq!(Float, u.cos_theta, wide.cos_theta, ulps = 4));
    }

    #[test]
    fn merge_opposed_covers_sphere() {
        let a = Cone::new(Vector3f::new(0.0, 0.0, 1.0), (1.7 as Float).cos());
        let b = Cone::new(Vector3f::new(0.0, 0.0, -1.0), (1.7 as Float).cos());
        let u = a.merge(b);
        assert_eq!(u.cos_theta, -1.0);
    }

    #[test]
    fn merge_with_full_sphere_is_full_sphere() {
        let a = Cone::new(Vector3f::new(1.0, 0.0, 0.0), 0.9);
        let u = a.merge(Cone::full_sphere());
        assert_eq!(u.cos_theta, -1.0);
    }
}
