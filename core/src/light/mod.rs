//! Light

use crate::geometry::*;
use crate::lumen::*;
use std::sync::Arc;

mod light_type;

/// Light trait provides the view of an emitter that light-importance
/// sampling needs: scalar power, spatial bounds and directional bounds.
pub trait Light {
    /// Returns the type of light.
    fn get_type(&self) -> LightType;

    /// Returns the total emitted power as a scalar weight.
    fn power(&self) -> Float;

    /// Returns the world-space bounds of the emitting geometry. Degenerate
    /// for delta-position lights, unused for infinite lights.
    fn bound(&self) -> Bounds3f;

    /// Returns the world-space center of the emitting geometry.
    fn center(&self) -> Point3f;

    /// Returns the orientation cone bounding emission directions, or the
    /// full-sphere sentinel for omnidirectional and infinite emitters.
    fn cone(&self) -> Cone;

    /// Returns true if the light emits from both sides of its surface.
    fn is_two_sided(&self) -> bool {
        false
    }

    /// Returns true if the light has bounded spatial extent.
    fn is_finite(&self) -> bool {
        !self.get_type().is_infinite()
    }
}

/// Atomic reference counted `Light`.
pub type ArcLight = Arc<dyn Light + Send + Sync>;

// Re-export
pub use light_type::*;
