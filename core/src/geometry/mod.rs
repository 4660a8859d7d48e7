//! Geometry

mod bounds3;
mod cone;
mod point3;
mod vector3;

// Re-export
pub use bounds3::*;
pub use cone::*;
pub use point3::*;
pub use vector3::*;
