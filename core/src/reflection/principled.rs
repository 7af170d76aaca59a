//! Metallic/roughness workflow mixture lobe.

use super::*;
use crate::microfacet::TrowbridgeReitzDistribution;
use crate::sampling::{cosine_hemisphere_pdf, cosine_sample_hemisphere};
use crate::spectrum::Spectrum;

/// A single-lobe mixture of Lambertian diffuse and Trowbridge-Reitz
/// specular reflection driven by base color, metallic fraction and
/// roughness. The specular half is chosen for sampling with probability
/// `t`, computed by the material from the relative Fresnel weight.
#[derive(Copy, Clone, Debug)]
pub struct PrincipledBxDF {
    /// Surface base color.
    basecolor: Spectrum,

    /// Metallic fraction in [0, 1].
    metallic: Float,

    /// Microfacet distribution for the specular half.
    mfd: TrowbridgeReitzDistribution,

    /// Probability of sampling the specular half.
    t: Float,
}

impl PrincipledBxDF {
    /// Create a new `PrincipledBxDF`.
    ///
    /// * `basecolor` - Surface base color.
    /// * `metallic`  - Metallic fraction.
    /// * `alpha`     - Microfacet alpha (already remapped from roughness).
    /// * `t`         - Probability of sampling the specular half.
    pub fn new(basecolor: Spectrum, metallic: Float, alpha: Float, t: Float) -> Self {
        Self {
            basecolor,
            metallic,
            mfd: TrowbridgeReitzDistribution::new(alpha, alpha),
            t,
        }
    }

    pub fn flags(&self) -> BxDFFlags {
        BxDFFlags::DIFFUSE | BxDFFlags::GLOSSY | BxDFFlags::REFLECTION
    }

    pub fn f(&self, wo: &Vector3f, wi: &Vector3f) -> Spectrum {
        if !same_hemisphere(wo, wi) {
            return Spectrum::ZERO;
        }

        let cos_o = abs_cos_theta(wo);
        let cos_i = abs_cos_theta(wi);
        if cos_o == 0.0 || cos_i == 0.0 {
            return Spectrum::ZERO;
        }

        let wm = *wo + *wi;
        if wm.length_squared() == 0.0 {
            return Spectrum::ZERO;
        }
        let wm = wm.normalize();

        let fr = fr_schlick(f0(self.basecolor, self.metallic), wo.abs_dot(&wm));
        let specular =
            fr * (self.mfd.d(&wm) * self.mfd.g(wo, wi) / (4.0 * cos_o * cos_i));
        let diffuse = self.basecolor * ((1.0 - self.metallic) * INV_PI);

        diffuse + specular
    }

    pub fn sample_f(&self, wo: &Vector3f, u0: Float, u12: &Point2f) -> Option<BsdfSample> {
        if wo.z == 0.0 {
            return None;
        }

        let wi = if u0 < self.t {
            // Specular half: sample a visible normal and reflect.
            let wm = self.mfd.sample_wm(wo, u12);
            let wi = reflect(wo, &wm);
            if !same_hemisphere(wo, &wi) {
                return None;
            }
            wi
        } else {
            // Diffuse half: cosine-weighted hemisphere on wo's side.
            let mut wi = cosine_sample_hemisphere(u12);
            if wo.z < 0.0 {
                wi.z = -wi.z;
            }
            wi
        };

        // The blended density over both halves, so MIS weights stay
        // consistent no matter which half produced the direction.
        let pdf = self.pdf(wo, &wi);
        if pdf == 0.0 {
            return None;
        }

        Some(BsdfSample::new(self.f(wo, &wi), wi, pdf, self.flags()))
    }

    pub fn pdf(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        if !same_hemisphere(wo, wi) {
            return 0.0;
        }

        let wm = *wo + *wi;
        if wm.length_squared() == 0.0 {
            return 0.0;
        }
        let wm = wm.normalize().face_forward(&Vector3f::Z_AXIS);

        let specular_pdf = self.mfd.pdf(wo, &wm) / (4.0 * wo.abs_dot(&wm));
        let diffuse_pdf = cosine_hemisphere_pdf(abs_cos_theta(wi));
        self.t * specular_pdf + (1.0 - self.t) * diffuse_pdf
    }

    pub fn regularize(&mut self) {
        self.mfd.regularize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::microfacet::roughness_to_alpha;
    use crate::rng::RNG;

    fn lobe(metallic: Float, roughness: Float) -> PrincipledBxDF {
        PrincipledBxDF::new(
            Spectrum::from_rgb(0.8, 0.4, 0.2),
            metallic,
            roughness_to_alpha(roughness),
            0.5,
        )
    }

    #[test]
    fn sampler_and_pdf_agree() {
        let bxdf = lobe(0.4, 0.5);
        let wo = Vector3f::new(0.1, 0.2, 0.97).normalize();
        let mut rng = RNG::new(21);
        for _ in 0..2000 {
            let u0 = rng.uniform_float();
            let u = Point2f::new(rng.uniform_float(), rng.uniform_float());
            if let Some(s) = bxdf.sample_f(&wo, u0, &u) {
                let pdf = bxdf.pdf(&wo, &s.wi);
                assert!((pdf - s.pdf).abs() < 1e-3 * s.pdf.max(1.0));
            }
        }
    }

    #[test]
    fn is_never_specular() {
        assert!(!lobe(1.0, 0.0).flags().is_specular());
        assert!(lobe(0.0, 1.0).flags().is_non_specular());
    }

    #[test]
    fn pure_metal_has_no_diffuse_floor() {
        let metal = lobe(1.0, 0.8);
        let wo = Vector3f::new(0.0, 0.0, 1.0);
        // Perpendicular-ish pair far from the specular peak.
        let wi = Vector3f::new(0.95, 0.0, 0.3122499).normalize();
        let dielectric = lobe(0.0, 0.8);
        assert!(metal.f(&wo, &wi).luminance() < dielectric.f(&wo, &wi).luminance());
    }
}
