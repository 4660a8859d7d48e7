//! Mesh-level light trees.

use super::*;

/// A light tree over the triangles of one emissive surface. Same descent as
/// the scene-level tree, but leaves hold many more primitives and pick one by
/// a precomputed power distribution instead of per-primitive weights.
#[derive(Clone, Default)]
pub struct PrimitiveTree {
    /// Serialized nodes.
    pub nodes: Vec<Node>,

    /// Split boundary of each interior node.
    pub node_middles: Vec<u32>,

    /// Permutation from tree-leaf order to triangle indices.
    pub light_mapping: Vec<u32>,

    /// Inverse of `light_mapping`.
    pub light_orders: Vec<u32>,

    /// One power distribution per node; empty except at leaves.
    pub distributions: Vec<Distribution1D>,
}

impl PrimitiveTree {
    /// Creates a new empty `PrimitiveTree`; populated by
    /// `TreeBuilder::build_part()`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resizes the triangle mapping and its inverse.
    ///
    /// * `num_primitives` - Number of triangles.
    pub(crate) fn allocate_light_mapping(&mut self, num_primitives: u32) {
        self.light_mapping.resize(num_primitives as usize, 0);
        self.light_orders.resize(num_primitives as usize, 0);
    }

    /// Resizes the serialized node arrays.
    ///
    /// * `num_nodes` - Number of nodes.
    pub(crate) fn allocate_nodes(&mut self, num_nodes: u32) {
        self.nodes.resize(num_nodes as usize, Node::default());
        self.node_middles.resize(num_nodes as usize, 0);
    }

    /// Stochastically picks one triangle toward the shading point `p` and
    /// returns it with the probability of the pick. The caller must ensure
    /// the tree was built over at least one triangle.
    ///
    /// * `p`      - The shading point.
    /// * `random` - Uniform random sample in [0, 1).
    pub fn random_light(&self, p: Point3f, random: Float) -> SampledLight {
        let mut pdf = 1.0;
        let mut random = min(random, ONE_MINUS_EPSILON);
        let mut id = 0_usize;

        loop {
            let node = &self.nodes[id];

            if node.has_children {
                let c0 = node.children_or_light as usize;

                let w0 = self.nodes[c0].weight(p);
                let w1 = self.nodes[c0 + 1].weight(p);

                let p0 = w0 / (w0 + w1);

                if random < p0 {
                    id = c0;
                    pdf *= p0;
                    random = min(random / p0, ONE_MINUS_EPSILON);
                } else {
                    let p1 = 1.0 - p0;
                    id = c0 + 1;
                    pdf *= p1;
                    random = min((random - p0) / p1, ONE_MINUS_EPSILON);
                }
            } else {
                let (offset, leaf_pdf, _) = self.distributions[id].sample_discrete(random);

                return SampledLight {
                    light: self.light_mapping[node.children_or_light as usize + offset],
                    pdf: pdf * leaf_pdf,
                };
            }
        }
    }

    /// Returns the probability that `random_light()` would pick the given
    /// triangle from `p`.
    ///
    /// * `p`        - The shading point.
    /// * `triangle` - The triangle index.
    pub fn pdf(&self, p: Point3f, triangle: u32) -> Float {
        let lo = self.light_orders[triangle as usize];

        let mut pdf = 1.0;
        let mut id = 0_usize;

        loop {
            let node = &self.nodes[id];

            if node.has_children {
                let c0 = node.children_or_light as usize;

                let w0 = self.nodes[c0].weight(p);
                let w1 = self.nodes[c0 + 1].weight(p);
                let wt = w0 + w1;

                if lo < self.node_middles[id] {
                    pdf *= w0 / wt;
                    id = c0;
                } else {
                    pdf *= w1 / wt;
                    id = c0 + 1;
                }
            } else {
                let offset = (lo - node.children_or_light) as usize;
                return pdf * self.distributions[id].discrete_pdf(offset);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    /// A grid of quads in the xy-plane, two triangles each. Coplanar, so the
    /// merged cone is a single direction.
    fn flat_grid(nx: u32, ny: u32) -> EmissivePart {
        let mut positions = Vec::new();
        let mut indices = Vec::new();

        for y in 0..ny {
            for x in 0..nx {
                let base = positions.len() as u32;
                let (fx, fy) = (x as Float, y as Float);

                positions.push(Point3f::new(fx, fy, 0.0));
                positions.push(Point3f::new(fx + 1.0, fy, 0.0));
                positions.push(Point3f::new(fx + 1.0, fy + 1.0, 0.0));
                positions.push(Point3f::new(fx, fy + 1.0, 0.0));

                indices.extend_from_slice(&[base, base + 1, base + 2]);
                indices.extend_from_slice(&[base, base + 2, base + 3]);
            }
        }

        EmissivePart::new(&positions, &indices, 1.0, false)
    }

    /// An accordion strip of `n` quad cells along x with vertex heights
    /// alternating between 0 and 2; adjacent cell normals spread wide enough
    /// that the merged cone never passes the tight-cone test.
    fn accordion(n: u32) -> EmissivePart {
        let mut positions = Vec::new();
        let mut indices = Vec::new();

        for x in 0..n {
            let base = positions.len() as u32;
            let fx = x as Float;
            let z0 = (x % 2) as Float * 2.0;
            let z1 = ((x + 1) % 2) as Float * 2.0;

            positions.push(Point3f::new(fx, 0.0, z0));
            positions.push(Point3f::new(fx + 1.0, 0.0, z1));
            positions.push(Point3f::new(fx + 1.0, 1.0, z1));
            positions.push(Point3f::new(fx, 1.0, z0));

            indices.extend_from_slice(&[base, base + 1, base + 2]);
            indices.extend_from_slice(&[base, base + 2, base + 3]);
        }

        EmissivePart::new(&positions, &indices, 1.0, false)
    }

    fn build(part: &EmissivePart) -> PrimitiveTree {
        let mut tree = PrimitiveTree::new();
        let mut builder = TreeBuilder::new();
        builder.build_part(&mut tree, part);
        tree
    }

    #[test]
    fn empty_part_produces_empty_tree() {
        let part = EmissivePart::new(&[], &[], 1.0, false);
        let tree = build(&part);
        assert!(tree.nodes.is_empty());
        assert!(tree.light_mapping.is_empty());
    }

    #[test]
    fn pdf_sums_to_one_over_all_triangles() {
        let part = accordion(24);
        let tree = build(&part);

        for p in [
            Point3f::new(12.0, 0.5, 3.0),
            Point3f::new(0.0, 0.0, 1.5),
            Point3f::new(30.0, -3.0, 2.0),
        ] {
            let sum: Float = (0..part.num_primitives()).map(|t| tree.pdf(p, t)).sum();
            assert!(approx_eq!(Float, sum, 1.0, epsilon = 1e-3));
        }
    }

    #[test]
    fn forward_and_backward_pdfs_agree() {
        let part = accordion(20);
        let tree = build(&part);
        let p = Point3f::new(4.5, 0.5, 2.5);

        for i in 0..512 {
            let u = min((i as Float + 0.5) / 512.0, ONE_MINUS_EPSILON);
            let s = tree.random_light(p, u);
            assert!(s.pdf > 0.0);
            assert!((tree.pdf(p, s.light) - s.pdf).abs() < 1e-5);
        }
    }

    #[test]
    fn nearby_triangles_are_favored() {
        let part = accordion(32);
        let tree = build(&part);
        assert!(tree.nodes.len() > 1);

        // Shading point hovering over the strip's left end.
        let p = Point3f::new(0.5, 0.5, 1.2);

        let near: Float = (0..4).map(|t| tree.pdf(p, t)).sum();
        let far: Float = (part.num_primitives() - 4..part.num_primitives())
            .map(|t| tree.pdf(p, t))
            .sum();
        assert!(near > 10.0 * far);
    }

    #[test]
    fn tight_cone_stops_subdivision() {
        // Coplanar grid: the merged cone is a single direction, so the tight
        // cone test fires at the root and the tree is one leaf.
        let part = flat_grid(4, 4);
        let tree = build(&part);
        assert_eq!(tree.nodes.len(), 1);
        assert!(!tree.nodes[0].has_children);
        assert_eq!(tree.nodes[0].num_lights, part.num_primitives());
        assert_eq!(tree.distributions.len(), 1);
    }
}
