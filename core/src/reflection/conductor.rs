//! Rough conductor reflection.

use super::*;
use crate::microfacet::TrowbridgeReitzDistribution;
use crate::spectrum::Spectrum;

/// Metallic reflection with a Trowbridge-Reitz microfacet distribution.
/// Degenerates to a perfect mirror when the distribution is effectively
/// smooth.
#[derive(Copy, Clone, Debug)]
pub struct ConductorBxDF {
    /// Microfacet distribution.
    mfd: TrowbridgeReitzDistribution,

    /// Reflectance at normal incidence.
    f0: Spectrum,
}

impl ConductorBxDF {
    /// Create a new `ConductorBxDF`.
    ///
    /// * `mfd` - Microfacet distribution.
    /// * `f0`  - Reflectance at normal incidence.
    pub fn new(mfd: TrowbridgeReitzDistribution, f0: Spectrum) -> Self {
        Self { mfd, f0 }
    }

    pub fn flags(&self) -> BxDFFlags {
        if self.mfd.effectively_smooth() {
            BxDFFlags::SPECULAR | BxDFFlags::REFLECTION
        } else {
            BxDFFlags::GLOSSY | BxDFFlags::REFLECTION
        }
    }

    pub fn f(&self, wo: &Vector3f, wi: &Vector3f) -> Spectrum {
        if !same_hemisphere(wo, wi) || self.mfd.effectively_smooth() {
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

        let fr = fr_schlick(self.f0, wo.abs_dot(&wm));
        fr * (self.mfd.d(&wm) * self.mfd.g(wo, wi) / (4.0 * cos_o * cos_i))
    }

    pub fn sample_f(&self, wo: &Vector3f, _u0: Float, u12: &Point2f) -> Option<BsdfSample> {
        if self.mfd.effectively_smooth() {
            // Treat as a perfect mirror with Fresnel attenuation.
            let wi = Vector3f::new(-wo.x, -wo.y, wo.z);
            let cos_i = abs_cos_theta(&wi);
            if cos_i == 0.0 {
                return None;
            }
            let f = fr_schlick(self.f0, cos_i) / cos_i;
            return Some(BsdfSample::new(f, wi, 1.0, self.flags()));
        }

        if wo.z == 0.0 {
            return None;
        }

        // Sample a visible half-vector and reflect about it.
        let wm = self.mfd.sample_wm(wo, u12);
        let wi = reflect(wo, &wm);
        if !same_hemisphere(wo, &wi) {
            return None;
        }

        // Change of variables from half-vector to incident direction.
        let pdf = self.mfd.pdf(wo, &wm) / (4.0 * wo.abs_dot(&wm));
        if pdf == 0.0 {
            return None;
        }

        Some(BsdfSample::new(self.f(wo, &wi), wi, pdf, self.flags()))
    }

    pub fn pdf(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        if !same_hemisphere(wo, wi) || self.mfd.effectively_smooth() {
            return 0.0;
        }

        let wm = *wo + *wi;
        if wm.length_squared() == 0.0 {
            return 0.0;
        }
        let wm = wm.normalize().face_forward(&Vector3f::Z_AXIS);
        self.mfd.pdf(wo, &wm) / (4.0 * wo.abs_dot(&wm))
    }

    pub fn regularize(&mut self) {
        self.mfd.regularize();
    }
}
