//! Spectrum

use crate::base::*;
use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Sub};

/// Number of spectral channels.
pub const SPECTRUM_SAMPLES: usize = 3;

/// Default to using `RGBSpectrum` for rendering.
pub type Spectrum = RGBSpectrum;

/// A spectral power distribution represented with one red, green and blue
/// channel. Physically meaningful values are non-negative; NaN and infinity
/// are tolerated during evaluation and clamped at the film (see
/// `integrators`).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RGBSpectrum {
    /// Red channel.
    pub r: Float,

    /// Green channel.
    pub g: Float,

    /// Blue channel.
    pub b: Float,
}

impl RGBSpectrum {
    /// Black.
    pub const ZERO: Self = Self { r: 0.0, g: 0.0, b: 0.0 };

    /// Unit spectrum.
    pub const ONE: Self = Self { r: 1.0, g: 1.0, b: 1.0 };

    /// Creates a spectrum with the same value in every channel.
    ///
    /// * `c` - The channel value.
    pub const fn new(c: Float) -> Self {
        Self { r: c, g: c, b: c }
    }

    /// Creates a spectrum from individual channel values.
    pub const fn from_rgb(r: Float, g: Float, b: Float) -> Self {
        Self { r, g, b }
    }

    /// Returns true if all channels are zero.
    pub fn is_black(&self) -> bool {
        self.r == 0.0 && self.g == 0.0 && self.b == 0.0
    }

    /// Returns true if any channel is NaN.
    pub fn has_nans(&self) -> bool {
        self.r.is_nan() || self.g.is_nan() || self.b.is_nan()
    }

    /// Returns true if any channel is infinite.
    pub fn has_infs(&self) -> bool {
        self.r.is_infinite() || self.g.is_infinite() || self.b.is_infinite()
    }

    /// Returns the luminance of the spectrum (Rec. 709 weights).
    pub fn luminance(&self) -> Float {
        0.2126 * self.r + 0.7152 * self.g + 0.0722 * self.b
    }

    /// Returns the value of the largest channel.
    pub fn max_component_value(&self) -> Float {
        max(self.r, max(self.g, self.b))
    }

    /// Component-wise linear interpolation toward another spectrum.
    ///
    /// * `t`     - Parameter in [0, 1].
    /// * `other` - Spectrum at t=1.
    pub fn lerp(&self, t: Float, other: &Self) -> Self {
        *self * (1.0 - t) + *other * t
    }
}

impl Add for RGBSpectrum {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::from_rgb(self.r + other.r, self.g + other.g, self.b + other.b)
    }
}

impl AddAssign for RGBSpectrum {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for RGBSpectrum {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::from_rgb(self.r - other.r, self.g - other.g, self.b - other.b)
    }
}

impl Mul for RGBSpectrum {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        Self::from_rgb(self.r * other.r, self.g * other.g, self.b * other.b)
    }
}

impl MulAssign for RGBSpectrum {
    fn mul_assign(&mut self, other: Self) {
        *self = *self * other;
    }
}

impl Mul<Float> for RGBSpectrum {
    type Output = Self;

    fn mul(self, s: Float) -> Self {
        Self::from_rgb(self.r * s, self.g * s, self.b * s)
    }
}

impl Mul<RGBSpectrum> for Float {
    type Output = RGBSpectrum;

    fn mul(self, s: RGBSpectrum) -> RGBSpectrum {
        s * self
    }
}

impl MulAssign<Float> for RGBSpectrum {
    fn mul_assign(&mut self, s: Float) {
        *self = *self * s;
    }
}

impl Div<Float> for RGBSpectrum {
    type Output = Self;

    fn div(self, s: Float) -> Self {
        debug_assert!(s != 0.0);
        let inv = 1.0 / s;
        self * inv
    }
}

impl DivAssign<Float> for RGBSpectrum {
    fn div_assign(&mut self, s: Float) {
        *self = *self / s;
    }
}

impl fmt::Display for RGBSpectrum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn black_detection() {
        assert!(Spectrum::ZERO.is_black());
        assert!(!Spectrum::new(0.1).is_black());
    }

    #[test]
    fn luminance_of_white_is_one() {
        assert!(approx_eq!(Float, Spectrum::ONE.luminance(), 1.0, epsilon = 1e-5));
    }

    #[test]
    fn nan_and_inf_detection() {
        assert!(Spectrum::from_rgb(0.0, Float::NAN, 0.0).has_nans());
        assert!(Spectrum::from_rgb(Float::INFINITY, 0.0, 0.0).has_infs());
        assert!(!Spectrum::ONE.has_nans());
    }

    #[test]
    fn lerp_endpoints() {
        let a = Spectrum::new(1.0);
        let b = Spectrum::new(3.0);
        assert_eq!(a.lerp(0.0, &b), a);
        assert_eq!(a.lerp(1.0, &b), b);
        assert_eq!(a.lerp(0.5, &b), Spectrum::new(2.0));
    }
}
