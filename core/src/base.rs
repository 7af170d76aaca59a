//! Common numeric types and helpers.

#![allow(dead_code)]

use num_traits::Num;

/// Use 32-bit precision for floating point numbers.
pub type Float = f32;

/// Default signed integer to 32-bit.
pub type Int = i32;

/// Infinity (∞)
pub const INFINITY: Float = Float::INFINITY;

/// PI (π)
pub const PI: Float = std::f32::consts::PI;

/// 1/PI (1/π)
pub const INV_PI: Float = 1.0 / PI;

/// PI/2 (π/2)
pub const PI_OVER_TWO: Float = PI * 0.5;

/// 2*PI (2π)
pub const TWO_PI: Float = PI * 2.0;

/// 1/2*PI (1/2π)
pub const INV_TWO_PI: Float = 1.0 / TWO_PI;

/// 4*PI (4π)
pub const FOUR_PI: Float = PI * 4.0;

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

/// Clamps a value between a lower and upper bound.
///
/// * `value` - The value to clamp.
/// * `low`   - Lower bound.
/// * `high`  - Upper bound.
#[inline(always)]
pub fn clamp<T>(value: T, low: T, high: T) -> T
where
    T: Num + PartialOrd + Copy,
{
    if value < low {
        low
    } else if value > high {
        high
    } else {
        value
    }
}

/// Returns the square of a value.
///
/// * `v` - The value.
#[inline(always)]
pub fn sqr(v: Float) -> Float {
    v * v
}

/// Solves a quadratic equation `a*t^2 + b*t + c = 0` and returns the two
/// roots in ascending order. Returns `None` when there is no real solution.
///
/// * `a` - Quadratic coefficient.
/// * `b` - Linear coefficient.
/// * `c` - Constant coefficient.
pub fn quadratic(a: Float, b: Float, c: Float) -> Option<(Float, Float)> {
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }
    let root_discriminant = discriminant.sqrt();

    // Numerically stable form from the usual cancellation-avoiding rewrite.
    let q = if b < 0.0 {
        -0.5 * (b - root_discriminant)
    } else {
        -0.5 * (b + root_discriminant)
    };

    let t0 = q / a;
    let t1 = c / q;
    if t0 <= t1 {
        Some((t0, t1))
    } else {
        Some((t1, t0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_bounds() {
        assert_eq!(clamp(5, 0, 3), 3);
        assert_eq!(clamp(-1.0, 0.0, 3.0), 0.0);
        assert_eq!(clamp(2.0, 0.0, 3.0), 2.0);
    }

    #[test]
    fn quadratic_roots_ordered() {
        let (t0, t1) = quadratic(1.0, -3.0, 2.0).unwrap();
        assert!((t0 - 1.0).abs() < 1e-6);
        assert!((t1 - 2.0).abs() < 1e-6);
    }

    #[test]
    fn quadratic_no_real_roots() {
        assert!(quadratic(1.0, 0.0, 1.0).is_none());
    }
}
