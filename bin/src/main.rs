#[macro_use]
extern crate log;

use core::app::*;
use core::geometry::*;
use core::light::*;
use core::light_tree::*;
use core::lumen::*;
use core::scene::Scene;
use lights::*;
use std::sync::Arc;

/// Builds a light tree over a procedural scene and reports, per light, how
/// often stratified sampling picks it against the probability the tree
/// claims for that pick.
fn main() {
    env_logger::init();

    let options = options();

    let scene = Scene::new(make_lights(options));
    let num_lights = scene.num_lights();

    let mut tree = Tree::new();
    let mut builder = TreeBuilder::new();
    builder.build(&mut tree, &scene);

    info!("built tree over {num_lights} lights");

    let p = Point3f::new(options.px, options.py, options.pz);
    let n = options.samples;

    let mut counts = vec![0_u32; num_lights as usize];
    for i in 0..n {
        let u = min((i as Float + 0.5) / n as Float, ONE_MINUS_EPSILON);
        let sampled = tree.random_light(&scene, p, u);
        counts[sampled.light as usize] += 1;
    }

    println!("shading point ({}, {}, {})", p.x, p.y, p.z);
    println!("{:>6} {:>12} {:>12}", "light", "frequency", "pdf");

    let mut total_pdf = 0.0;
    for (light, &count) in counts.iter().enumerate() {
        let frequency = count as Float / n as Float;
        let pdf = tree.pdf(&scene, p, light as u32);
        total_pdf += pdf;
        println!("{light:>6} {frequency:>12.6} {pdf:>12.6}");
    }
    println!("{:>6} {:>12} {total_pdf:>12.6}", "", "");
}

/// A grid of point lights in the xz-plane with an optional environment light.
///
/// * `options` - The command line options.
fn make_lights(options: &Options) -> Vec<ArcLight> {
    let mut lights: Vec<ArcLight> = Vec::new();

    for i in 0..options.grid {
        for j in 0..options.grid {
            let intensity = 0.25 + ((i * options.grid + j) % 7) as Float;
            lights.push(Arc::new(PointLight::new(
                Point3f::new(i as Float, 1.0, j as Float),
                intensity,
            )));
        }
    }

    if options.environment > 0.0 {
        let world_radius = 2.0 * options.grid as Float;
        lights.push(Arc::new(InfiniteAreaLight::new(
            options.environment,
            world_radius,
        )));
    }

    lights
}
