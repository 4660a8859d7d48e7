//! Scene

use crate::geometry::*;
use crate::light::*;
use crate::light_tree::LightSet;
use crate::lumen::*;

/// Scene.
#[derive(Clone)]
pub struct Scene {
    /// All light sources in the scene.
    pub lights: Vec<ArcLight>,

    /// The bounding box of the finite scene lights.
    pub world_bound: Bounds3f,
}

impl Scene {
    /// Creates a new `Scene`.
    ///
    /// * `lights` - All light sources in the scene.
    pub fn new(lights: Vec<ArcLight>) -> Self {
        let world_bound = lights
            .iter()
            .filter(|l| l.is_finite())
            .fold(Bounds3f::empty(), |b, l| b.union(&l.bound()));

        Self {
            lights,
            world_bound,
        }
    }

    /// Returns the number of lights in the scene.
    pub fn num_lights(&self) -> u32 {
        self.lights.len() as u32
    }

    /// Returns the light with the given index.
    ///
    /// * `light` - The light index.
    pub fn light(&self, light: u32) -> &ArcLight {
        &self.lights[light as usize]
    }
}

impl LightSet for Scene {
    /// Returns the bounds of the light with the given index.
    ///
    /// * `light` - The light index.
    fn light_aabb(&self, light: u32) -> Bounds3f {
        self.lights[light as usize].bound()
    }

    /// Returns the orientation cone of the light with the given index.
    ///
    /// * `light` - The light index.
    fn light_cone(&self, light: u32) -> Cone {
        self.lights[light as usize].cone()
    }

    /// Returns the power of the light with the given index.
    ///
    /// * `light` - The light index.
    fn light_power(&self, light: u32) -> Float {
        self.lights[light as usize].power()
    }

    /// Returns the center of the light with the given index.
    ///
    /// * `light` - The light index.
    fn light_center(&self, light: u32) -> Point3f {
        self.lights[light as usize].center()
    }

    /// Returns whether the light with the given index is two sided.
    ///
    /// * `light` - The light index.
    fn light_two_sided(&self, light: u32) -> bool {
        self.lights[light as usize].is_two_sided()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct FixedLight {
        light_type: LightType,
        center: Point3f,
    }

    impl Light for FixedLight {
        fn get_type(&self) -> LightType {
            self.light_type
        }

        fn power(&self) -> Float {
            1.0
        }

        fn bound(&self) -> Bounds3f {
            Bounds3f::from(self.center)
        }

        fn center(&self) -> Point3f {
            self.center
        }

        fn cone(&self) -> Cone {
            Cone::full_sphere()
        }
    }

    #[test]
    fn scene_keeps_the_given_lights() {
        let a: ArcLight = Arc::new(FixedLight {
            light_type: LightType::DELTA_POSITION_LIGHT,
            center: Point3f::new(1.0, 0.0, 0.0),
        });
        let b: ArcLight = Arc::new(FixedLight {
            light_type: LightType::INFINITE_LIGHT,
            center: Point3f::zero(),
        });

        let scene = Scene::new(vec![Arc::clone(&a), Arc::clone(&b)]);

        assert_eq!(scene.num_lights(), 2);
        assert!(Arc::ptr_eq(scene.light(0), &a));
        assert!(Arc::ptr_eq(scene.light(1), &b));
    }

    #[test]
    fn world_bound_covers_only_finite_lights() {
        let lights: Vec<ArcLight> = vec![
            Arc::new(FixedLight {
                light_type: LightType::DELTA_POSITION_LIGHT,
                center: Point3f::new(-2.0, 1.0, 0.0),
            }),
            Arc::new(FixedLight {
                light_type: LightType::DELTA_POSITION_LIGHT,
                center: Point3f::new(3.0, -1.0, 5.0),
            }),
            Arc::new(FixedLight {
                light_type: LightType::INFINITE_LIGHT,
                center: Point3f::new(1000.0, 0.0, 0.0),
            }),
        ];

        let scene = Scene::new(lights);

        assert_eq!(scene.world_bound.p_min, Point3f::new(-2.0, -1.0, 0.0));
        assert_eq!(scene.world_bound.p_max, Point3f::new(3.0, 1.0, 5.0));
    }
}
