//! Light Types

use bitflags::bitflags;

bitflags! {
    /// Stores combination of flags for the light types.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct LightType: u8 {
        const DELTA_POSITION_LIGHT = 1;
        const DELTA_DIRECTION_LIGHT = 2;
        const AREA_LIGHT = 4;
        const INFINITE_LIGHT = 8;
    }
}

impl LightType {
    /// Tests a single light type flag and returns whether it is set or not.
    ///
    /// * `other` - Light type flag to match.
    pub fn matches(&self, other: Self) -> bool {
        self.intersects(other)
    }

    /// Returns true if the light has no bounded spatial extent: environment
    /// maps and distant lights reach the scene from infinity.
    pub fn is_infinite(&self) -> bool {
        self.contains(Self::INFINITE_LIGHT) || self.contains(Self::DELTA_DIRECTION_LIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infinite_flags() {
        assert!(LightType::INFINITE_LIGHT.is_infinite());
        assert!(LightType::DELTA_DIRECTION_LIGHT.is_infinite());
        assert!(!LightType::DELTA_POSITION_LIGHT.is_infinite());
        assert!(!LightType::AREA_LIGHT.is_infinite());
    }
}
