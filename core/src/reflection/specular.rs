//! Perfect specular reflection.

use super::*;
use crate::spectrum::Spectrum;

/// A perfect mirror. The scattering function is a delta distribution: it
/// cannot be evaluated for arbitrary direction pairs and carries no density,
/// only sampled.
#[derive(Copy, Clone, Debug)]
pub struct SpecularReflectionBxDF {
    /// Reflectance.
    r: Spectrum,
}

impl SpecularReflectionBxDF {
    /// Create a new `SpecularReflectionBxDF`.
    ///
    /// * `r` - Reflectance.
    pub fn new(r: Spectrum) -> Self {
        Self { r }
    }

    pub fn flags(&self) -> BxDFFlags {
        BxDFFlags::SPECULAR | BxDFFlags::REFLECTION
    }

    pub fn f(&self, _wo: &Vector3f, _wi: &Vector3f) -> Spectrum {
        Spectrum::ZERO
    }

    pub fn sample_f(&self, wo: &Vector3f, _u0: Float, _u12: &Point2f) -> Option<BsdfSample> {
        let wi = Vector3f::new(-wo.x, -wo.y, wo.z);
        let cos_i = abs_cos_theta(&wi);
        if cos_i == 0.0 {
            return None;
        }

        // The delta cancels against the implicit delta in the density; the
        // cosine division leaves the throughput update with plain `r`.
        Some(BsdfSample::new(self.r / cos_i, wi, 1.0, self.flags()))
    }

    pub fn pdf(&self, _wo: &Vector3f, _wi: &Vector3f) -> Float {
        0.0
    }
}
