//! Distant Light Source

use core::geometry::*;
use core::light::*;
use core::lumen::*;

/// Implements a directional light source that deposits illumination from the
/// same direction at every point in space.
#[derive(Clone)]
pub struct DistantLight {
    /// Light source type.
    pub light_type: LightType,

    /// The emitted radiance `L`.
    pub emitted_radiance: Float,

    /// Direction the light travels.
    pub w_light: Vector3f,

    /// Radius of the spherical world bounds.
    pub world_radius: Float,
}

impl DistantLight {
    /// Returns a new `DistantLight`.
    ///
    /// * `emitted_radiance` - The emitted radiance.
    /// * `w_light`          - Direction the light travels.
    /// * `world_radius`     - Radius of the spherical world bounds.
    pub fn new(emitted_radiance: Float, w_light: Vector3f, world_radius: Float) -> Self {
        Self {
            light_type: LightType::DELTA_DIRECTION_LIGHT,
            emitted_radiance,
            w_light: w_light.normalize(),
            world_radius,
        }
    }
}

impl Light for DistantLight {
    /// Returns the type of light.
    fn get_type(&self) -> LightType {
        self.light_type
    }

    /// Return the total emitted power: the radiance through a disk of the
    /// world's radius facing the light.
    fn power(&self) -> Float {
        self.emitted_radiance * PI * self.world_radius * self.world_radius
    }

    /// Returns the bounds of the light.
    fn bound(&self) -> Bounds3f {
        Bounds3f::empty()
    }

    /// Returns the center of the light.
    fn center(&self) -> Point3f {
        Point3f::zero()
    }

    /// Returns the light's emission cone.
    fn cone(&self) -> Cone {
        Cone {
            axis: self.w_light,
            cos_theta: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn distant_light_lives_in_the_infinite_pool() {
        let light = DistantLight::new(1.0, Vector3f::new(0.0, -1.0, 0.0), 10.0);
        assert!(!light.is_finite());
        assert!(approx_eq!(Float, light.power(), 100.0 * PI, epsilon = 1e-3));
        assert!(approx_eq!(Float, light.cone().axis.y, -1.0, epsilon = 1e-6));
    }
}
