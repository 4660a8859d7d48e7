//! Sampling

mod distribution_1d;

// Re-export
pub use distribution_1d::*;
