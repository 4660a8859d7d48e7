//! Diffuse Area Light Source

use core::geometry::*;
use core::light::*;
use core::lumen::*;

/// Implements a rectangular diffuse area light defined by its center and two
/// half-edge vectors, emitting uniformly over its surface.
#[derive(Clone)]
pub struct DiffuseAreaLight {
    /// Light source type.
    pub light_type: LightType,

    /// The emitted radiance `L`.
    pub emitted_radiance: Float,

    /// Center of the rectangle.
    pub p_center: Point3f,

    /// Half-edge vector along the first side.
    pub edge_u: Vector3f,

    /// Half-edge vector along the second side.
    pub edge_v: Vector3f,

    /// Surface normal.
    pub normal: Vector3f,

    /// Surface area of the rectangle.
    pub area: Float,

    /// Whether the light emits from both sides of its surface.
    pub two_sided: bool,
}

impl DiffuseAreaLight {
    /// Returns a new `DiffuseAreaLight`.
    ///
    /// * `emitted_radiance` - The emitted radiance.
    /// * `p_center`         - Center of the rectangle.
    /// * `edge_u`           - Half-edge vector along the first side.
    /// * `edge_v`           - Half-edge vector along the second side.
    /// * `two_sided`        - Whether the light emits from both sides.
    pub fn new(
        emitted_radiance: Float,
        p_center: Point3f,
        edge_u: Vector3f,
        edge_v: Vector3f,
        two_sided: bool,
    ) -> Self {
        let cross = edge_u.cross(&edge_v);
        Self {
            light_type: LightType::AREA_LIGHT,
            emitted_radiance,
            p_center,
            edge_u,
            edge_v,
            normal: cross.normalize(),
            area: 4.0 * cross.length(),
            two_sided,
        }
    }
}

impl Light for DiffuseAreaLight {
    /// Returns the type of light.
    fn get_type(&self) -> LightType {
        self.light_type
    }

    /// Return the total emitted power.
    fn power(&self) -> Float {
        let sides = if self.two_sided { 2.0 } else { 1.0 };
        sides * self.emitted_radiance * self.area * PI
    }

    /// Returns the bounds of the light.
    fn bound(&self) -> Bounds3f {
        Bounds3f::from(self.p_center + self.edge_u + self.edge_v)
            .union_point(self.p_center + self.edge_u - self.edge_v)
            .union_point(self.p_center - self.edge_u + self.edge_v)
            .union_point(self.p_center - self.edge_u - self.edge_v)
    }

    /// Returns the center of the light.
    fn center(&self) -> Point3f {
        self.p_center
    }

    /// Returns the light's emission cone.
    fn cone(&self) -> Cone {
        Cone {
            axis: self.normal,
            cos_theta: 1.0,
        }
    }

    /// Returns whether the light emits from both sides of its surface.
    fn is_two_sided(&self) -> bool {
        self.two_sided
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    fn unit_quad(two_sided: bool) -> DiffuseAreaLight {
        DiffuseAreaLight::new(
            1.0,
            Point3f::zero(),
            Vector3f::new(0.5, 0.0, 0.0),
            Vector3f::new(0.0, 0.5, 0.0),
            two_sided,
        )
    }

    #[test]
    fn area_and_power_from_half_edges() {
        let light = unit_quad(false);
        assert!(approx_eq!(Float, light.area, 1.0, epsilon = 1e-6));
        assert!(approx_eq!(Float, light.power(), PI, epsilon = 1e-5));

        let both = unit_quad(true);
        assert!(both.is_two_sided());
        assert!(approx_eq!(Float, both.power(), TWO_PI, epsilon = 1e-5));
    }

    #[test]
    fn bound_covers_the_rectangle() {
        let light = unit_quad(false);
        let b = light.bound();
        assert_eq!(b.p_min, Point3f::new(-0.5, -0.5, 0.0));
        assert_eq!(b.p_max, Point3f::new(0.5, 0.5, 0.0));
        assert!(approx_eq!(Float, light.cone().axis.z, 1.0, epsilon = 1e-6));
    }
}
