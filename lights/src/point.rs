//! Point Light Source

use core::geometry::*;
use core::light::*;
use core::lumen::*;

/// Implements an isotropic point light source that emits the same amount of
/// light in all directions.
#[derive(Clone)]
pub struct PointLight {
    /// Light source type.
    pub light_type: LightType,

    /// Position.
    pub p_light: Point3f,

    /// Intensity.
    pub intensity: Float,
}

impl PointLight {
    /// Returns a new `PointLight`.
    ///
    /// * `p_light`   - Position.
    /// * `intensity` - Intensity.
    pub fn new(p_light: Point3f, intensity: Float) -> Self {
        Self {
            light_type: LightType::DELTA_POSITION_LIGHT,
            p_light,
            intensity,
        }
    }
}

impl Light for PointLight {
    /// Returns the type of light.
    fn get_type(&self) -> LightType {
        self.light_type
    }

    /// Return the total emitted power.
    fn power(&self) -> Float {
        FOUR_PI * self.intensity
    }

    /// Returns the bounds of the light.
    fn bound(&self) -> Bounds3f {
        Bounds3f::from(self.p_light)
    }

    /// Returns the center of the light.
    fn center(&self) -> Point3f {
        self.p_light
    }

    /// Returns the light's emission cone.
    fn cone(&self) -> Cone {
        Cone::full_sphere()
    }
}
