//! Fresnel reflectance approximations.

use crate::base::*;
use crate::spectrum::Spectrum;

/// Reflectance of dielectrics at normal incidence.
pub const DIELECTRIC_F0: Float = 0.04;

/// Returns the reflectance at normal incidence for a surface described by
/// a base color and a metallic fraction: dielectrics reflect a fixed 4%,
/// metals tint the reflection with their base color.
///
/// * `basecolor` - Surface base color.
/// * `metallic`  - Metallic fraction in [0, 1].
#[inline]
pub fn f0(basecolor: Spectrum, metallic: Float) -> Spectrum {
    Spectrum::new(DIELECTRIC_F0).lerp(metallic, &basecolor)
}

/// Schlick's approximation of the Fresnel reflectance.
///
/// * `f0`        - Reflectance at normal incidence.
/// * `cos_theta` - Cosine of the incident angle.
#[inline]
pub fn fr_schlick(f0: Spectrum, cos_theta: Float) -> Spectrum {
    let c = clamp(cos_theta, 0.0, 1.0);
    f0 + (Spectrum::ONE - f0) * (1.0 - c).powi(5)
}

/// Schlick's approximation for a dielectric boundary, parameterized by the
/// relative index of refraction across it.
///
/// * `cos_theta` - Cosine of the incident angle.
/// * `eta`       - Relative index of refraction.
#[inline]
pub fn fr_schlick_dielectric(cos_theta: Float, eta: Float) -> Float {
    let r0 = sqr((eta - 1.0) / (eta + 1.0));
    let c = clamp(cos_theta, 0.0, 1.0);
    r0 + (1.0 - r0) * (1.0 - c).powi(5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn f0_endpoints() {
        let base = Spectrum::from_rgb(0.9, 0.5, 0.3);
        assert_eq!(f0(base, 0.0), Spectrum::new(DIELECTRIC_F0));
        assert_eq!(f0(base, 1.0), base);
    }

    #[test]
    fn schlick_is_one_at_grazing() {
        let fr = fr_schlick(Spectrum::new(0.04), 0.0);
        assert!(approx_eq!(Float, fr.r, 1.0, epsilon = 1e-5));
    }

    #[test]
    fn schlick_dielectric_normal_incidence() {
        // Glass at eta 1.5 reflects 4% head-on.
        let fr = fr_schlick_dielectric(1.0, 1.5);
        assert!(approx_eq!(Float, fr, 0.04, epsilon = 1e-4));
    }
}
