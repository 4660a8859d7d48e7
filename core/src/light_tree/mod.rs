//! Hierarchical light-importance sampling.
//!
//! Implementation of "Importance Sampling of Many Lights with Adaptive Tree
//! Splitting" (Estevez & Kulla, HPG 2018): a binary tree over the scene's
//! finite lights picks a single emitter toward a shading point in O(log n),
//! weighting the choice by power, inverse-squared distance and orientation
//! cone bounds. Infinite lights live in a separate root-level pool sampled
//! by a 1-D power distribution.

use crate::geometry::*;
use crate::lumen::*;
use crate::sampling::*;

mod builder;
mod part;
mod primitive;

// Re-export
pub use builder::*;
pub use part::*;
pub use primitive::*;

/// Maximum number of lights in a scene-level leaf.
pub const MAX_LEAF_LIGHTS: u32 = 4;

/// The splitting budget: upper bound on the lights a single shading point
/// may enumerate when a tree is exhaustively split at render time.
pub const MAX_LIGHTS: u32 = 64;

/// Maximum tree depth for render-time adaptive splitting.
pub const MAX_SPLIT_DEPTH: u32 = 6;

/// Lower bound on squared distances in importance weights, so a shading
/// point inside a cluster does not blow up its weight.
pub const MIN_DISTANCE_SQUARED: Float = 1e-4;

/// The builder-facing view of an indexed set of emitters. The scene-level
/// tree builds over `Scene` lights, the mesh-level tree over the triangles
/// of one emissive surface; both expose the same capability set.
pub trait LightSet: Sync {
    /// Returns the bounds of the light with the given index.
    ///
    /// * `light` - The light index.
    fn light_aabb(&self, light: u32) -> Bounds3f;

    /// Returns the orientation cone of the light with the given index.
    ///
    /// * `light` - The light index.
    fn light_cone(&self, light: u32) -> Cone;

    /// Returns the power of the light with the given index.
    ///
    /// * `light` - The light index.
    fn light_power(&self, light: u32) -> Float;

    /// Returns the center of the light with the given index.
    ///
    /// * `light` - The light index.
    fn light_center(&self, light: u32) -> Point3f;

    /// Returns whether the light with the given index is two sided.
    ///
    /// * `light` - The light index.
    fn light_two_sided(&self, light: u32) -> bool;
}

/// Return value for `random_light()`: the chosen emitter and the probability
/// with which it was chosen.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SampledLight {
    /// The chosen light's index in the external light set.
    pub light: u32,

    /// Probability mass of this choice at the query point.
    pub pdf: Float,
}

/// A serialized tree node. Children of an interior node stored at index
/// `children_or_light` and `children_or_light + 1`; for a leaf,
/// `children_or_light` is the offset of its first light in `light_mapping`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Node {
    /// Centroid of the node's bounds.
    pub center: Point3f,

    /// Half the diagonal of the node's bounds.
    pub radius: Float,

    /// Directional union of the emission cones in the subtree.
    pub cone: Cone,

    /// Total power of the lights in the subtree.
    pub power: Float,

    /// Variance of the light powers in the subtree.
    pub variance: Float,

    /// Interior node marker.
    pub has_children: bool,

    /// Whether any light in the subtree emits from both sides.
    pub two_sided: bool,

    /// First child index, or the leaf's offset into the light mapping.
    pub children_or_light: u32,

    /// Number of lights in the subtree.
    pub num_lights: u32,
}

impl Node {
    /// Returns the unnormalized importance of this node as seen from `p`.
    ///
    /// * `p` - The shading point.
    pub fn weight(&self, p: Point3f) -> Float {
        self.power / max(self.center.distance_squared(p), MIN_DISTANCE_SQUARED)
    }
}

/// Returns the unnormalized importance of a single light as seen from `p`.
///
/// * `set`   - The light set.
/// * `light` - The light index.
/// * `p`     - The shading point.
fn light_weight<S: LightSet>(set: &S, light: u32, p: Point3f) -> Float {
    set.light_power(light) / max(set.light_center(light).distance_squared(p), MIN_DISTANCE_SQUARED)
}

/// The scene-level light tree. Immutable once built; queries are read-only
/// descents safe to run from many render threads concurrently.
#[derive(Clone, Default)]
pub struct Tree {
    /// Serialized nodes; children of node `i` with `has_children` are stored
    /// at `children_or_light` and `children_or_light + 1`.
    pub nodes: Vec<Node>,

    /// Split boundary of each interior node: the light order where its right
    /// subtree begins. Drives containment tests during `pdf()` descent.
    pub node_middles: Vec<u32>,

    /// Permutation from tree-leaf order to external light indices, infinite
    /// lights first.
    pub light_mapping: Vec<u32>,

    /// Inverse of `light_mapping`.
    pub light_orders: Vec<u32>,

    /// Power of each infinite light, in mapping order.
    pub infinite_light_powers: Vec<Float>,

    /// Power-proportional distribution over the infinite lights.
    pub infinite_light_distribution: Distribution1D,

    /// Root-level probability mass assigned to the infinite-light pool.
    pub infinite_weight: Float,

    /// Branch threshold for the infinite pool. Equal to `infinite_weight`,
    /// except a sentinel > 1 when no finite lights exist so the infinite
    /// branch is always taken even at `random == 1.0`.
    pub infinite_guard: Float,

    /// Depth bias shifting sampling weight away from the infinite pool when
    /// the finite tree's splitting budget is tight.
    pub infinite_depth_bias: u32,

    /// One past the last infinite light in leaf order.
    pub infinite_end: u32,

    /// Total number of lights the tree was built over.
    pub num_lights: u32,
}

impl Tree {
    /// Creates a new empty `Tree`; populated by `TreeBuilder::build()`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resizes the light mapping and its inverse.
    ///
    /// * `num_lights` - Total number of lights.
    pub(crate) fn allocate_light_mapping(&mut self, num_lights: u32) {
        self.light_mapping.resize(num_lights as usize, 0);
        self.light_orders.resize(num_lights as usize, 0);
    }

    /// Resizes the infinite-light power buffer.
    ///
    /// * `num_infinite_lights` - Number of infinite lights.
    pub(crate) fn allocate(&mut self, num_infinite_lights: u32) {
        self.infinite_light_powers
            .resize(num_infinite_lights as usize, 0.0);
    }

    /// Resizes the serialized node arrays.
    ///
    /// * `num_nodes` - Number of nodes.
    pub(crate) fn allocate_nodes(&mut self, num_nodes: u32) {
        self.nodes.resize(num_nodes as usize, Node::default());
        self.node_middles.resize(num_nodes as usize, 0);
    }

    /// Stochastically picks one light toward the shading point `p` and
    /// returns it along with the probability of the pick. Summed over every
    /// light in the tree, that probability is 1. The caller must ensure the
    /// tree was built over at least one light.
    ///
    /// * `set`    - The light set the tree was built over.
    /// * `p`      - The shading point.
    /// * `random` - Uniform random sample in [0, 1).
    pub fn random_light<S: LightSet>(&self, set: &S, p: Point3f, random: Float) -> SampledLight {
        let infinite_weight = self.infinite_weight;

        if random < self.infinite_guard {
            let (offset, pdf, _) = self
                .infinite_light_distribution
                .sample_discrete(random / infinite_weight);

            return SampledLight {
                light: self.light_mapping[offset],
                pdf: pdf * infinite_weight,
            };
        }

        let mut pdf = 1.0 - infinite_weight;
        let mut random = min((random - infinite_weight) / pdf, ONE_MINUS_EPSILON);
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
                return self.sample_leaf(set, node, p, random, pdf);
            }
        }
    }

    /// Picks one light within a leaf by per-light importance CDF inversion.
    ///
    /// * `set`    - The light set.
    /// * `node`   - The leaf node.
    /// * `p`      - The shading point.
    /// * `random` - Remapped random sample in [0, 1).
    /// * `pdf`    - The probability accumulated during descent.
    fn sample_leaf<S: LightSet>(
        &self,
        set: &S,
        node: &Node,
        p: Point3f,
        random: Float,
        pdf: Float,
    ) -> SampledLight {
        let first = node.children_or_light as usize;
        let n = node.num_lights as usize;

        if n == 1 {
            return SampledLight {
                light: self.light_mapping[first],
                pdf,
            };
        }

        let mut weights = [0.0 as Float; MAX_LEAF_LIGHTS as usize];
        let mut total = 0.0;
        for (i, w) in weights.iter_mut().enumerate().take(n) {
            *w = light_weight(set, self.light_mapping[first + i], p);
            total += *w;
        }

        let mut cdf = 0.0;
        for (i, w) in weights.iter().enumerate().take(n - 1) {
            cdf += w / total;
            if random < cdf {
                return SampledLight {
                    light: self.light_mapping[first + i],
                    pdf: pdf * (w / total),
                };
            }
        }

        SampledLight {
            light: self.light_mapping[first + n - 1],
            pdf: pdf * (weights[n - 1] / total),
        }
    }

    /// Returns the probability that `random_light()` would pick the given
    /// light from `p`. Used for multiple-importance-sampling weights when
    /// another technique already produced the light.
    ///
    /// * `set`   - The light set the tree was built over.
    /// * `p`     - The shading point.
    /// * `light` - The light's index in the external light set.
    pub fn pdf<S: LightSet>(&self, set: &S, p: Point3f, light: u32) -> Float {
        let infinite_weight = self.infinite_weight;

        let lo = self.light_orders[light as usize];

        if lo < self.infinite_end {
            return infinite_weight * self.infinite_light_distribution.discrete_pdf(lo as usize);
        }

        let mut pdf = 1.0 - infinite_weight;
        let mut id = 0_usize;

        loop {
            let node = &self.nodes[id];

            if node.has_children {
                let c0 = node.children_or_light as usize;

                let w0 = self.nodes[c0].weight(p);
                let w1 = self.nodes[c0 + 1].weight(p);
                let wt = w0 + w1;

                // Subtree containment via the leaf-order split boundary.
                if lo < self.node_middles[id] {
                    pdf *= w0 / wt;
                    id = c0;
                } else {
                    pdf *= w1 / wt;
                    id = c0 + 1;
                }
            } else {
                let first = node.children_or_light as usize;
                let n = node.num_lights as usize;

                if n == 1 {
                    return pdf;
                }

                let mut total = 0.0;
                let mut w = 0.0;
                for i in 0..n {
                    let wi = light_weight(set, self.light_mapping[first + i], p);
                    total += wi;
                    if first + i == lo as usize {
                        w = wi;
                    }
                }

                return pdf * (w / total);
            }
        }
    }
}
