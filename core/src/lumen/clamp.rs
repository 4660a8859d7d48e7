//! Clamp

/// Clamps a value between a low and high value.
///
/// * `val`  - The value.
/// * `low`  - Lower limit.
/// * `high` - Upper limit.
#[inline(always)]
pub fn clamp<T>(val: T, low: T, high: T) -> T
where
    T: PartialOrd + Copy,
{
    if val < low {
        low
    } else if val > high {
        high
    } else {
        val
    }
}
