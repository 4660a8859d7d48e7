//! Core

#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

// Re-export.
pub mod app;
pub mod geometry;
pub mod light;
pub mod light_tree;
pub mod lumen;
pub mod sampling;
pub mod scene;
