//! Light tree construction.

use super::*;
use crate::scene::Scene;
use rayon::prelude::*;

/// Candidate-per-position split evaluation below this range length; coarser
/// strides above it.
const SCENE_SWEEP_THRESHOLD: u32 = 128;

/// Sweep threshold for mesh-level trees.
const PART_SWEEP_THRESHOLD: u32 = 32;

/// Number of candidate slices per axis for ranges past the sweep threshold.
const NUM_SLICES: u32 = 16;

/// Candidate scoring moves to the thread pool once
/// `range length × candidate count` exceeds this.
const PARALLEL_THRESHOLD: u32 = 1024;

/// An ephemeral build-time node in the integer-indexed arena. `middle` of 0
/// marks a leaf; otherwise it is the light order where the right subtree
/// begins.
#[derive(Copy, Clone, Default)]
struct BuildNode {
    bounds: Bounds3f,
    cone: Cone,
    power: Float,
    variance: Float,
    middle: u32,
    children_or_light: u32,
    num_lights: u32,
    two_sided: bool,
}

impl BuildNode {
    fn has_children(&self) -> bool {
        self.middle > 0
    }
}

/// Counts how many render-time adaptive splits exhaustively enumerating the
/// leaves would need within a fixed depth budget. A leaf past the budget
/// counts as `num_lights` splits, one at or under it counts as 1.
///
/// * `nodes`  - The build node arena.
/// * `id`     - The node to count from.
/// * `depth`  - The node's depth.
/// * `splits` - Accumulated split count.
fn count_max_splits(nodes: &[BuildNode], id: u32, depth: u32, splits: &mut u32) {
    let node = &nodes[id as usize];

    if !node.has_children() {
        if depth < MAX_SPLIT_DEPTH {
            *splits += node.num_lights;
        } else {
            *splits += 1;
        }
    } else if depth == MAX_SPLIT_DEPTH - 1 {
        *splits += 2;
    } else {
        count_max_splits(nodes, node.children_or_light, depth + 1, splits);
        count_max_splits(nodes, node.children_or_light + 1, depth + 1, splits);
    }
}

/// Sorts a light range along one axis by bounds centroid, with the light
/// index as tiebreak so equal centroids still yield one canonical order.
///
/// * `lights` - The light mapping being permuted.
/// * `begin`  - Start of the range.
/// * `end`    - End of the range (exclusive).
/// * `axis`   - The sort axis.
/// * `set`    - The light set.
fn sort_lights<S: LightSet>(lights: &mut [u32], begin: u32, end: u32, axis: usize, set: &S) {
    lights[begin as usize..end as usize].sort_by(|&a, &b| {
        let ac = set.light_aabb(a).centroid()[axis];
        let bc = set.light_aabb(b).centroid()[axis];
        ac.total_cmp(&bc).then(a.cmp(&b))
    });
}

/// Single-pass running variance of the light powers in a range.
///
/// * `lights` - The light mapping.
/// * `begin`  - Start of the range.
/// * `end`    - End of the range (exclusive).
/// * `set`    - The light set.
fn variance<S: LightSet>(lights: &[u32], begin: u32, end: u32, set: &S) -> Float {
    let mut average = 0.0;
    let mut average_squared = 0.0;

    for (n, i) in (begin..end).enumerate() {
        let power = set.light_power(lights[i as usize]);
        let inverse = 1.0 / (n + 1) as Float;

        average += (power - average) * inverse;
        average_squared += (power * power - average_squared) * inverse;
    }

    (average_squared - average * average).abs()
}

/// Closed-form approximation of the solid-angle contribution of a bounded
/// emission cone with half-angle `acos(cos)`. Keeps a spatially spread but
/// directionally aligned cluster from being penalized like an isotropic one.
///
/// * `cos` - Cosine of the cone's half-angle.
pub fn cone_importance(cos: Float) -> Float {
    let o = clamp(cos, -1.0, 1.0).acos();
    let w = min(o + PI_OVER_TWO, PI);
    let sin = o.sin();

    let b = PI_OVER_TWO * (2.0 * w * sin - (o - 2.0 * w).cos() - 2.0 * o * sin + cos);

    TWO_PI * (1.0 - cos) + b
}

/// A proposed partition of an axis-sorted light range at one split index.
/// Scoring aggregates the two halves independently; the cost prefers two
/// tight, oriented, high-power clusters over one spread, low-power mass.
#[derive(Clone)]
struct SplitCandidate {
    aabb_0: Bounds3f,
    aabb_1: Bounds3f,

    cone_0: Cone,
    cone_1: Cone,

    power_0: Float,
    power_1: Float,

    two_sided_0: bool,
    two_sided_1: bool,

    cost: Float,

    /// Split index into the light mapping; left half is `[begin, split)`.
    split: u32,

    axis: usize,
}

impl SplitCandidate {
    fn new(split: u32, axis: usize) -> Self {
        Self {
            aabb_0: Bounds3f::empty(),
            aabb_1: Bounds3f::empty(),
            cone_0: Cone::full_sphere(),
            cone_1: Cone::full_sphere(),
            power_0: 0.0,
            power_1: 0.0,
            two_sided_0: false,
            two_sided_1: false,
            cost: 0.0,
            split,
            axis,
        }
    }

    /// Aggregates both halves of the sorted range and scores the partition.
    ///
    /// * `lights` - The sorted light range.
    /// * `begin`  - Offset of the range within the light mapping.
    /// * `set`    - The light set.
    fn evaluate<S: LightSet>(&mut self, lights: &[u32], begin: u32, set: &S) {
        let split = (self.split - begin) as usize;

        let mut aabb_0 = Bounds3f::empty();
        let mut aabb_1 = Bounds3f::empty();

        let mut cone_0: Option<Cone> = None;
        let mut cone_1: Option<Cone> = None;

        let mut power_0 = 0.0;
        let mut power_1 = 0.0;

        let mut two_sided_0 = false;
        let mut two_sided_1 = false;

        for (i, &l) in lights.iter().enumerate() {
            let aabb = set.light_aabb(l);
            let cone = set.light_cone(l);
            let two_sided = set.light_two_sided(l);
            let power = set.light_power(l);

            if i < split {
                aabb_0 = aabb_0.union(&aabb);
                cone_0 = Some(cone_0.map_or(cone, |c| c.merge(cone)));
                two_sided_0 |= two_sided;
                power_0 += power;
            } else {
                aabb_1 = aabb_1.union(&aabb);
                cone_1 = Some(cone_1.map_or(cone, |c| c.merge(cone)));
                two_sided_1 |= two_sided;
                power_1 += power;
            }
        }

        let cone_0 = cone_0.unwrap_or_else(Cone::full_sphere);
        let cone_1 = cone_1.unwrap_or_else(Cone::full_sphere);

        let cone_weight_0 = cone_importance(cone_0.cos_theta) * if two_sided_0 { 2.0 } else { 1.0 };
        let cone_weight_1 = cone_importance(cone_1.cos_theta) * if two_sided_1 { 2.0 } else { 1.0 };

        self.cost = power_0 * cone_weight_0 * aabb_0.surface_area()
            + power_1 * cone_weight_1 * aabb_1.surface_area();

        self.aabb_0 = aabb_0;
        self.aabb_1 = aabb_1;
        self.cone_0 = cone_0;
        self.cone_1 = cone_1;
        self.power_0 = power_0;
        self.power_1 = power_1;
        self.two_sided_0 = two_sided_0;
        self.two_sided_1 = two_sided_1;
    }
}

/// Leaf-termination policy for one build: the scene-level tree stops at a
/// fixed light count, the mesh-level tree also stops once a range's cone is
/// tight.
#[derive(Copy, Clone)]
struct SplitLimits {
    max_lights: u32,

    /// A range whose merged cone has `cos_theta` above this becomes a leaf.
    /// Anything above 1 disables the test.
    tight_cone: Float,

    sweep_threshold: u32,
}

/// Builds `Tree` and `PrimitiveTree` instances. Long-lived: the node arena
/// and candidate buffer grow on demand and are reused across builds, so
/// per-frame rebuilds of animated scenes do not reallocate.
#[derive(Default)]
pub struct TreeBuilder {
    build_nodes: Vec<BuildNode>,
    candidates: Vec<SplitCandidate>,

    current_node: u32,
    light_order: u32,
}

impl TreeBuilder {
    /// Creates a new `TreeBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the scene-level tree: partitions lights into the infinite pool
    /// and the finite tree, recursively splits the finite lights, and
    /// serializes the result. Replaces whatever `tree` previously held.
    ///
    /// * `tree`  - The tree to (re)build.
    /// * `scene` - The scene.
    pub fn build(&mut self, tree: &mut Tree, scene: &Scene) {
        let num_lights = scene.num_lights();

        tree.allocate_light_mapping(num_lights);

        let mut lm = 0_usize;
        for l in 0..num_lights {
            if !scene.light(l).is_finite() {
                tree.light_mapping[lm] = l;
                lm += 1;
            }
        }

        let num_infinite_lights = lm as u32;

        for l in 0..num_lights {
            if scene.light(l).is_finite() {
                tree.light_mapping[lm] = l;
                lm += 1;
            }
        }

        tree.allocate(num_infinite_lights);

        self.light_order = 0;

        let mut infinite_total_power = 0.0;
        for i in 0..num_infinite_lights as usize {
            let l = tree.light_mapping[i];
            let power = scene.light_power(l);

            tree.infinite_light_powers[i] = power;
            tree.light_orders[l as usize] = self.light_order;
            self.light_order += 1;

            infinite_total_power += power;
        }

        tree.infinite_end = self.light_order;
        tree.infinite_light_distribution =
            Distribution1D::new(tree.infinite_light_powers.clone());

        let num_finite_lights = num_lights - num_infinite_lights;

        let mut infinite_depth_bias = 0_u32;

        if num_finite_lights > 0 {
            self.allocate(num_finite_lights);
            self.current_node = 1;

            let mut bounds = Bounds3f::empty();
            let mut cone: Option<Cone> = None;
            let mut two_sided = false;
            let mut total_power = 0.0;

            for i in num_infinite_lights..num_lights {
                let l = tree.light_mapping[i as usize];

                bounds = bounds.union(&scene.light_aabb(l));
                cone = Some(cone.map_or(scene.light_cone(l), |c| c.merge(scene.light_cone(l))));
                two_sided |= scene.light_two_sided(l);
                total_power += scene.light_power(l);
            }

            let limits = SplitLimits {
                max_lights: MAX_LEAF_LIGHTS,
                tight_cone: 2.0,
                sweep_threshold: SCENE_SWEEP_THRESHOLD,
            };

            let Tree {
                ref mut light_mapping,
                ref mut light_orders,
                ..
            } = *tree;

            self.split(
                light_mapping,
                light_orders,
                0,
                num_infinite_lights,
                num_lights,
                bounds,
                cone.unwrap_or_else(Cone::full_sphere),
                two_sided,
                total_power,
                scene,
                limits,
            );

            tree.allocate_nodes(self.current_node);
            self.serialize(&mut tree.nodes, &mut tree.node_middles);

            let mut max_splits = 0;
            count_max_splits(&self.build_nodes, 0, 0, &mut max_splits);

            if num_infinite_lights > 0 && num_infinite_lights < MAX_LIGHTS - 1 {
                let left = MAX_LIGHTS.saturating_sub(max_splits);
                if left < num_infinite_lights {
                    let over = (num_infinite_lights - left) as Float;
                    infinite_depth_bias = max(over.log2().ceil() as u32, 1);
                }
            }
        } else {
            tree.allocate_nodes(0);
        }

        tree.infinite_depth_bias = infinite_depth_bias;

        let p0 = infinite_total_power;
        let p1 = if num_finite_lights == 0 {
            0.0
        } else {
            self.build_nodes[0].power
        };
        let pt = p0 + p1;

        let mut infinite_weight = if num_lights == 0 { 0.0 } else { p0 / pt };

        // A tight splitting budget shifts mass towards the finite tree.
        if infinite_depth_bias > 0 {
            infinite_weight /= (1_u32 << infinite_depth_bias) as Float;
        }

        tree.infinite_weight = infinite_weight;

        // Sentinel above 1 so the infinite branch is taken even when
        // random == 1.0.
        tree.infinite_guard = if num_finite_lights == 0 {
            if num_infinite_lights == 0 {
                0.0
            } else {
                1.1
            }
        } else {
            infinite_weight
        };

        tree.num_lights = num_lights;

        info!(
            "light tree: {} nodes over {} finite / {} infinite lights",
            if num_finite_lights > 0 { self.current_node } else { 0 },
            num_finite_lights,
            num_infinite_lights
        );
    }

    /// Builds the mesh-level tree over the triangles of one emissive surface.
    /// Leaves stop at a primitive-count or cone-tightness threshold and each
    /// receives a discrete distribution over its triangle powers.
    ///
    /// * `tree` - The tree to (re)build.
    /// * `part` - The emissive mesh part.
    pub fn build_part(&mut self, tree: &mut PrimitiveTree, part: &EmissivePart) {
        let num_primitives = part.num_primitives();

        tree.allocate_light_mapping(num_primitives);

        for l in 0..num_primitives {
            tree.light_mapping[l as usize] = l;
        }

        if num_primitives == 0 {
            tree.allocate_nodes(0);
            tree.distributions.clear();
            return;
        }

        self.light_order = 0;
        self.allocate(num_primitives);
        self.current_node = 1;

        let limits = SplitLimits {
            max_lights: max(num_primitives / 32, 8),
            tight_cone: 0.5,
            sweep_threshold: PART_SWEEP_THRESHOLD,
        };

        let PrimitiveTree {
            ref mut light_mapping,
            ref mut light_orders,
            ..
        } = *tree;

        self.split(
            light_mapping,
            light_orders,
            0,
            0,
            num_primitives,
            part.bounds(),
            part.cone(),
            part.two_sided(),
            part.total_power(),
            part,
            limits,
        );

        tree.allocate_nodes(self.current_node);
        self.serialize_part(tree, part);

        info!(
            "primitive tree: {} nodes over {} triangles",
            self.current_node, num_primitives
        );
    }

    /// Grows the build-node arena if the current capacity is insufficient.
    /// Never shrinks; repeated builds reuse the buffers.
    ///
    /// * `num_lights` - Number of lights in the finite tree.
    fn allocate(&mut self, num_lights: u32) {
        let num_nodes = (2 * num_lights - 1) as usize;
        if num_nodes > self.build_nodes.len() {
            self.build_nodes.resize(num_nodes, BuildNode::default());
        }
    }

    /// Recursively partitions `[begin, end)` of the light mapping into the
    /// build-node arena. The range's aggregates are passed down from the
    /// parent's winning split candidate. Returns one past the last light
    /// order consumed.
    #[allow(clippy::too_many_arguments)]
    fn split<S: LightSet>(
        &mut self,
        lights: &mut [u32],
        orders: &mut [u32],
        node_id: u32,
        begin: u32,
        end: u32,
        bounds: Bounds3f,
        cone: Cone,
        two_sided: bool,
        total_power: Float,
        set: &S,
        limits: SplitLimits,
    ) -> u32 {
        let len = end - begin;

        if len <= limits.max_lights || cone.cos_theta > limits.tight_cone {
            for i in begin..end {
                orders[lights[i as usize] as usize] = self.light_order;
                self.light_order += 1;
            }

            self.build_nodes[node_id as usize] = BuildNode {
                bounds,
                cone,
                power: total_power,
                variance: variance(lights, begin, end, set),
                middle: 0,
                children_or_light: begin,
                num_lights: len,
                two_sided,
            };

            return begin + len;
        }

        let child0 = self.current_node;
        self.current_node += 2;

        let stride = if len < limits.sweep_threshold {
            1
        } else {
            max(len / NUM_SLICES, 1)
        };

        let surface_area = bounds.surface_area();
        let cone_weight = cone_importance(cone.cos_theta);
        let extent = bounds.diagonal();
        let max_extent = extent.max_component();

        // Evaluate the best candidate per axis; every evaluation re-sorts
        // the shared range, only the winning axis's order survives.
        let mut sc = self.evaluate_splits(lights, begin, end, stride, 0, set);
        let mut best_cost = (max_extent / extent[0]) * sc.cost / (surface_area * cone_weight);

        for axis in 1..3 {
            let candidate = self.evaluate_splits(lights, begin, end, stride, axis, set);
            let cost =
                (max_extent / extent[axis]) * candidate.cost / (surface_area * cone_weight);

            if cost < best_cost {
                best_cost = cost;
                sc = candidate;
            }
        }

        sort_lights(lights, begin, end, sc.axis, set);

        let c0_end = self.split(
            lights, orders, child0, begin, sc.split, sc.aabb_0, sc.cone_0, sc.two_sided_0,
            sc.power_0, set, limits,
        );
        let c1_end = self.split(
            lights,
            orders,
            child0 + 1,
            sc.split,
            end,
            sc.aabb_1,
            sc.cone_1,
            sc.two_sided_1,
            sc.power_1,
            set,
            limits,
        );

        self.build_nodes[node_id as usize] = BuildNode {
            bounds,
            cone,
            power: total_power,
            variance: variance(lights, begin, end, set),
            middle: c0_end,
            children_or_light: child0,
            num_lights: len,
            two_sided,
        };

        c1_end
    }

    /// Sorts the range along `axis`, generates a candidate every `stride`
    /// positions, scores them all and returns the cheapest. Ties go to the
    /// lowest split index, so the result is the deterministic arg-min over
    /// every evaluated candidate.
    fn evaluate_splits<S: LightSet>(
        &mut self,
        lights: &mut [u32],
        begin: u32,
        end: u32,
        stride: u32,
        axis: usize,
        set: &S,
    ) -> SplitCandidate {
        sort_lights(lights, begin, end, axis, set);

        self.candidates.clear();
        let mut split = begin + stride;
        while split < end {
            self.candidates.push(SplitCandidate::new(split, axis));
            split += stride;
        }

        let len = end - begin;
        let num_candidates = self.candidates.len() as u32;
        let range = &lights[begin as usize..end as usize];

        if len * num_candidates > PARALLEL_THRESHOLD {
            self.candidates
                .par_iter_mut()
                .for_each(|candidate| candidate.evaluate(range, begin, set));
        } else {
            for candidate in self.candidates.iter_mut() {
                candidate.evaluate(range, begin, set);
            }
        }

        let mut best = 0;
        for i in 1..self.candidates.len() {
            if self.candidates[i].cost < self.candidates[best].cost {
                best = i;
            }
        }

        self.candidates[best].clone()
    }

    /// Flattens the build-node arena into the runtime node array, replacing
    /// min/max bounds with centroid plus bounding radius, and records every
    /// node's split boundary.
    ///
    /// * `nodes`        - The runtime node array.
    /// * `node_middles` - The split boundary array.
    fn serialize(&self, nodes: &mut [Node], node_middles: &mut [u32]) {
        for i in 0..self.current_node as usize {
            let source = &self.build_nodes[i];

            nodes[i] = Node {
                center: source.bounds.centroid(),
                radius: 0.5 * source.bounds.diagonal().length(),
                cone: source.cone,
                power: source.power,
                variance: source.variance,
                has_children: source.has_children(),
                two_sided: source.two_sided,
                children_or_light: source.children_or_light,
                num_lights: source.num_lights,
            };

            node_middles[i] = source.middle;
        }
    }

    /// Mesh-level serialization: the node flattening plus one discrete
    /// distribution per leaf over its triangle powers, so a coarse spatial
    /// pick refines into an O(log k) pick of one triangle.
    ///
    /// * `tree` - The tree being built.
    /// * `part` - The emissive mesh part.
    fn serialize_part(&self, tree: &mut PrimitiveTree, part: &EmissivePart) {
        self.serialize(&mut tree.nodes, &mut tree.node_middles);

        tree.distributions.clear();

        for i in 0..self.current_node as usize {
            let source = &self.build_nodes[i];

            let powers = if source.has_children() {
                Vec::new()
            } else {
                (0..source.num_lights)
                    .map(|t| {
                        part.light_power(
                            tree.light_mapping[(source.children_or_light + t) as usize],
                        )
                    })
                    .collect()
            };

            tree.distributions.push(Distribution1D::new(powers));
        }
    }
}
