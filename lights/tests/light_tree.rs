//! Scene-level light tree over concrete light sources.

use core::geometry::*;
use core::light::*;
use core::light_tree::*;
use core::lumen::*;
use core::scene::Scene;
use float_cmp::approx_eq;
use lights::*;
use std::sync::Arc;

fn build(lights: Vec<ArcLight>) -> (Tree, Scene) {
    let scene = Scene::new(lights);
    let mut tree = Tree::new();
    let mut builder = TreeBuilder::new();
    builder.build(&mut tree, &scene);
    (tree, scene)
}

fn stratified(n: usize) -> impl Iterator<Item = Float> {
    (0..n).map(move |i| min((i as Float + 0.5) / n as Float, ONE_MINUS_EPSILON))
}

/// A mix of every light kind the renderer supports.
fn mixed_scene() -> Vec<ArcLight> {
    let mut lights: Vec<ArcLight> = Vec::new();

    for i in 0..6 {
        let f = i as Float;
        lights.push(Arc::new(PointLight::new(
            Point3f::new(f * 2.0, (f * 1.3).sin() * 4.0, -f),
            0.5 + f,
        )));
    }

    lights.push(Arc::new(DiffuseAreaLight::new(
        3.0,
        Point3f::new(0.0, 5.0, 0.0),
        Vector3f::new(1.0, 0.0, 0.0),
        Vector3f::new(0.0, 0.0, 1.0),
        false,
    )));
    lights.push(Arc::new(DiffuseAreaLight::new(
        1.5,
        Point3f::new(-4.0, 2.0, 3.0),
        Vector3f::new(0.5, 0.0, 0.0),
        Vector3f::new(0.0, 0.5, 0.0),
        true,
    )));

    lights.push(Arc::new(DistantLight::new(
        0.8,
        Vector3f::new(0.0, -1.0, 0.2),
        15.0,
    )));
    lights.push(Arc::new(InfiniteAreaLight::new(0.2, 15.0)));

    lights
}

#[test]
fn mixed_scene_pdf_sums_to_one() {
    let lights = mixed_scene();
    let n = lights.len();
    let (tree, scene) = build(lights);

    for p in [
        Point3f::zero(),
        Point3f::new(3.0, 1.0, -2.0),
        Point3f::new(-10.0, 8.0, 5.0),
    ] {
        let sum: Float = (0..n).map(|id| tree.pdf(&scene, p, id as u32)).sum();
        assert!(approx_eq!(Float, sum, 1.0, epsilon = 1e-4));
    }
}

#[test]
fn mixed_scene_forward_and_backward_pdfs_agree() {
    let (tree, scene) = build(mixed_scene());
    let p = Point3f::new(1.0, 2.0, 0.0);

    for u in stratified(1024) {
        let s = tree.random_light(&scene, p, u);
        assert!(s.pdf > 0.0);
        assert!(approx_eq!(
            Float,
            tree.pdf(&scene, p, s.light),
            s.pdf,
            epsilon = 1e-5
        ));
    }
}

#[test]
fn infinite_pool_weight_follows_total_power() {
    // One point light of power 10 and one environment light of power 5:
    // a third of the probability mass goes to the infinite pool.
    let lights: Vec<ArcLight> = vec![
        Arc::new(PointLight::new(Point3f::new(0.0, 3.0, 0.0), 10.0 / FOUR_PI)),
        Arc::new(InfiniteAreaLight::new(5.0 / PI, 1.0)),
    ];

    let (tree, scene) = build(lights);

    assert!(approx_eq!(Float, tree.infinite_weight, 1.0 / 3.0, epsilon = 1e-5));
    assert!(approx_eq!(
        Float,
        tree.pdf(&scene, Point3f::zero(), 1),
        1.0 / 3.0,
        epsilon = 1e-5
    ));
}

#[test]
fn closer_point_lights_are_sampled_more() {
    let lights: Vec<ArcLight> = vec![
        Arc::new(PointLight::new(Point3f::new(0.0, 1.0, 0.0), 1.0)),
        Arc::new(PointLight::new(Point3f::new(100.0, 1.0, 0.0), 1.0)),
    ];

    let (tree, scene) = build(lights);
    let p = Point3f::zero();

    let near = tree.pdf(&scene, p, 0);
    let far = tree.pdf(&scene, p, 1);
    assert!(near > 100.0 * far);
    assert!(approx_eq!(Float, near + far, 1.0, epsilon = 1e-5));
}

#[test]
fn two_sided_area_light_doubles_its_share() {
    let make = |two_sided| {
        let lights: Vec<ArcLight> = vec![
            Arc::new(DiffuseAreaLight::new(
                1.0,
                Point3f::zero(),
                Vector3f::new(1.0, 0.0, 0.0),
                Vector3f::new(0.0, 1.0, 0.0),
                two_sided,
            )),
            Arc::new(PointLight::new(Point3f::new(0.0, 0.0, 5.0), 1.0)),
        ];
        build(lights)
    };

    let p = Point3f::new(0.0, 0.0, 2.5);
    let (one, scene_one) = make(false);
    let (two, scene_two) = make(true);

    // Doubling the emitted power shifts probability toward the area light.
    assert!(two.pdf(&scene_two, p, 0) > one.pdf(&scene_one, p, 0));
}
