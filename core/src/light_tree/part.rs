//! Emissive mesh parts.

use super::*;

/// The triangles of one emissive surface, viewed as a light set. Per-triangle
/// bounds, normals, powers and centroids are precomputed once so the tree
/// build and the render-time queries never touch the mesh again.
pub struct EmissivePart {
    aabbs: Vec<Bounds3f>,
    cones: Vec<Cone>,
    powers: Vec<Float>,
    centers: Vec<Point3f>,

    bounds: Bounds3f,
    cone: Cone,
    total_power: Float,
    two_sided: bool,
}

impl EmissivePart {
    /// Creates a new `EmissivePart` from an indexed triangle mesh with a
    /// uniform emitted radiance. A triangle's power is its radiance scaled by
    /// area (doubled for two-sided emission); its cone is the geometric
    /// normal with zero spread.
    ///
    /// * `positions` - The mesh vertices.
    /// * `indices`   - Three vertex indices per triangle.
    /// * `radiance`  - Emitted radiance of the surface.
    /// * `two_sided` - Whether the surface emits from both sides.
    pub fn new(
        positions: &[Point3f],
        indices: &[u32],
        radiance: Float,
        two_sided: bool,
    ) -> Self {
        let num_triangles = indices.len() / 3;

        let mut aabbs = Vec::with_capacity(num_triangles);
        let mut cones = Vec::with_capacity(num_triangles);
        let mut powers = Vec::with_capacity(num_triangles);
        let mut centers = Vec::with_capacity(num_triangles);

        let mut bounds = Bounds3f::empty();
        let mut cone: Option<Cone> = None;
        let mut total_power = 0.0;

        for t in 0..num_triangles {
            let a = positions[indices[3 * t] as usize];
            let b = positions[indices[3 * t + 1] as usize];
            let c = positions[indices[3 * t + 2] as usize];

            let cross = (b - a).cross(&(c - a));
            let area = 0.5 * cross.length();

            let normal = if area > 0.0 {
                cross.normalize()
            } else {
                Vector3f::new(0.0, 0.0, 1.0)
            };

            let aabb = Bounds3f::from(a).union_point(b).union_point(c);
            let sides = if two_sided { 2.0 } else { 1.0 };
            let power = radiance * area * PI * sides;
            let triangle_cone = Cone {
                axis: normal,
                cos_theta: 1.0,
            };

            bounds = bounds.union(&aabb);
            cone = Some(cone.map_or(triangle_cone, |c| c.merge(triangle_cone)));
            total_power += power;

            aabbs.push(aabb);
            cones.push(triangle_cone);
            powers.push(power);
            centers.push(aabb.centroid());
        }

        Self {
            aabbs,
            cones,
            powers,
            centers,
            bounds,
            cone: cone.unwrap_or_else(Cone::full_sphere),
            total_power,
            two_sided,
        }
    }

    /// Returns the number of triangles.
    pub fn num_primitives(&self) -> u32 {
        self.powers.len() as u32
    }

    /// Returns the bounds of the whole part.
    pub fn bounds(&self) -> Bounds3f {
        self.bounds
    }

    /// Returns the merged emission cone of the whole part.
    pub fn cone(&self) -> Cone {
        self.cone
    }

    /// Returns the total power of the part.
    pub fn total_power(&self) -> Float {
        self.total_power
    }

    /// Returns whether the part emits from both sides.
    pub fn two_sided(&self) -> bool {
        self.two_sided
    }
}

impl LightSet for EmissivePart {
    fn light_aabb(&self, light: u32) -> Bounds3f {
        self.aabbs[light as usize]
    }

    fn light_cone(&self, light: u32) -> Cone {
        self.cones[light as usize]
    }

    fn light_power(&self, light: u32) -> Float {
        self.powers[light as usize]
    }

    fn light_center(&self, light: u32) -> Point3f {
        self.centers[light as usize]
    }

    fn light_two_sided(&self, _light: u32) -> bool {
        self.two_sided
    }
}
