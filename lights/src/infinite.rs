//! Infinite Area Light Source

use core::geometry::*;
use core::light::*;
use core::lumen::*;

/// Implements an infinite area light source surrounding the entire scene,
/// with a uniform emitted radiance.
#[derive(Clone)]
pub struct InfiniteAreaLight {
    /// Light source type.
    pub light_type: LightType,

    /// The emitted radiance `L`.
    pub emitted_radiance: Float,

    /// Radius of the spherical world bounds.
    pub world_radius: Float,
}

impl InfiniteAreaLight {
    /// Returns a new `InfiniteAreaLight`.
    ///
    /// * `emitted_radiance` - The emitted radiance.
    /// * `world_radius`     - Radius of the spherical world bounds.
    pub fn new(emitted_radiance: Float, world_radius: Float) -> Self {
        Self {
            light_type: LightType::INFINITE_LIGHT,
            emitted_radiance,
            world_radius,
        }
    }
}

impl Light for InfiniteAreaLight {
    /// Returns the type of light.
    fn get_type(&self) -> LightType {
        self.light_type
    }

    /// Return the total emitted power.
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
        Cone::full_sphere()
    }
}
