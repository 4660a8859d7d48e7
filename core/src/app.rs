//! Application related stuff

use crate::lumen::Float;
use clap::Parser;

lazy_static! {
    /// The global application options.
    pub static ref OPTIONS: Options = Options::parse();
}

/// System wide options.
#[derive(Parser, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Options {
    /// Point lights per side of the square grid.
    #[clap(
        long = "grid",
        short = 'g',
        value_name = "NUM",
        default_value_t = 8,
        help = "Point lights per side of the square grid."
    )]
    pub grid: u32,

    /// Radiance of the environment light; 0 disables it.
    #[clap(
        long = "environment",
        short = 'e',
        value_name = "FLOAT",
        default_value_t = 0.1,
        help = "Radiance of the environment light; 0 disables it."
    )]
    pub environment: Float,

    /// Number of stratified samples to draw.
    #[clap(
        long = "samples",
        short = 's',
        value_name = "NUM",
        default_value_t = 100_000,
        help = "Number of stratified samples to draw."
    )]
    pub samples: u32,

    /// X-coordinate of the shading point.
    #[clap(long = "px", value_name = "FLOAT", default_value_t = 0.0)]
    pub px: Float,

    /// Y-coordinate of the shading point.
    #[clap(long = "py", value_name = "FLOAT", default_value_t = 0.5)]
    pub py: Float,

    /// Z-coordinate of the shading point.
    #[clap(long = "pz", value_name = "FLOAT", default_value_t = 0.0)]
    pub pz: Float,
}

/// Returns the global application options.
pub fn options() -> &'static Options {
    &OPTIONS
}
