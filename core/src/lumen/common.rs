//! Common

#![allow(dead_code)]

use num_traits::Num;

/// Use 32-bit precision for floating point numbers.
pub type Float = f32;

/// Infinty (∞)
pub const INFINITY: Float = Float::INFINITY;

/// PI (π)
pub const PI: Float = std::f32::consts::PI;

/// PI/2 (π/2)
pub const PI_OVER_TWO: Float = PI * 0.5;

/// 2*PI (2π)
pub const TWO_PI: Float = PI * 2.0;

/// 4*PI (4π)
pub const FOUR_PI: Float = PI * 4.0;

/// Machine Epsilon
pub const MACHINE_EPSILON: Float = f32::EPSILON * 0.5;

/// Largest representable value below 1.0.
pub const ONE_MINUS_EPSILON: Float = 1.0 - MACHINE_EPSILON;

/// Returns the minimum of 2 numbers.
///
/// * `a` - First number.
/// * `b` - Second number.
#[inline(always)]
pub fn min<T>(a: T, b: T) -> T
where
    T: Num + PartialOrd + Copy,
{
    if a < b {
        a
    } else {
        b
    }
}

/// Returns the maximum of 2 numbers.
///
/// * `a` - First number.
/// * `b` - Second number.
#[inline(always)]
pub fn max<T>(a: T, b: T) -> T
where
    T: Num + PartialOrd + Copy,
{
    if a > b {
        a
    } else {
        b
    }
}

/// Emulates the behavior of `upper_bound` but uses a function object to get
/// values at various indices instead of requiring access to an actual array.
///
/// * `size` - Size of array.
/// * `pred` - Function that returns a value at a given index.
pub fn find_interval<Predicate>(size: usize, pred: Predicate) -> usize
where
    Predicate: Fn(usize) -> bool,
{
    let (mut first, mut len) = (0, size);

    while len > 0 {
        let half = len >> 1;
        let middle = first + half;

        // Bisect range based on value of `pred` at `middle`.
        if pred(middle) {
            first = middle + 1;
            len -= half + 1;
        } else {
            len = half;
        }
    }

    super::clamp(first.max(1) - 1, 0, size - 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_interval_bisects_sorted_values() {
        let cdf = [0.0, 0.25, 0.5, 0.75, 1.0];
        assert_eq!(find_interval(cdf.len(), |i| cdf[i] <= 0.3), 1);
        assert_eq!(find_interval(cdf.len(), |i| cdf[i] <= 0.0), 0);
        assert_eq!(find_interval(cdf.len(), |i| cdf[i] <= 1.0), 3);
    }
}
