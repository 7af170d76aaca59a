//! Lambertian reflection.

use super::*;
use crate::sampling::{cosine_hemisphere_pdf, cosine_sample_hemisphere};
use crate::spectrum::Spectrum;

/// Perfectly diffuse reflection distributing incident illumination equally
/// in all directions.
#[derive(Copy, Clone, Debug)]
pub struct DiffuseBxDF {
    /// Reflectance in [0, 1].
    r: Spectrum,
}

impl DiffuseBxDF {
    /// Create a new `DiffuseBxDF`.
    ///
    /// * `r` - Reflectance.
    pub fn new(r: Spectrum) -> Self {
        Self { r }
    }

    pub fn flags(&self) -> BxDFFlags {
        if self.r.is_black() {
            BxDFFlags::empty()
        } else {
            BxDFFlags::DIFFUSE | BxDFFlags::REFLECTION
        }
    }

    pub fn f(&self, wo: &Vector3f, wi: &Vector3f) -> Spectrum {
        if !same_hemisphere(wo, wi) {
            Spectrum::ZERO
        } else {
            self.r * INV_PI
        }
    }

    /// Cosine-weighted hemisphere sampling on the side of the outgoing
    /// direction.
    pub fn sample_f(&self, wo: &Vector3f, _u0: Float, u12: &Point2f) -> Option<BsdfSample> {
        let mut wi = cosine_sample_hemisphere(u12);
        if wo.z < 0.0 {
            wi.z = -wi.z;
        }

        let pdf = cosine_hemisphere_pdf(abs_cos_theta(&wi));
        if pdf == 0.0 {
            return None;
        }

        Some(BsdfSample::new(self.r * INV_PI, wi, pdf, self.flags()))
    }

    pub fn pdf(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        if !same_hemisphere(wo, wi) {
            0.0
        } else {
            cosine_hemisphere_pdf(abs_cos_theta(wi))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RNG;

    // The hemispherical-directional reflectance of a Lambertian surface is
    // its albedo; the importance-sampled estimator must converge to it.
    #[test]
    fn white_furnace_recovers_albedo() {
        let albedo = 0.73;
        let bxdf = DiffuseBxDF::new(Spectrum::new(albedo));
        let wo = Vector3f::new(0.2, 0.1, 0.9).normalize();
        let mut rng = RNG::new(1);

        let n = 100_000;
        let mut sum = 0.0f64;
        for _ in 0..n {
            let u = Point2f::new(rng.uniform_float(), rng.uniform_float());
            if let Some(s) = bxdf.sample_f(&wo, 0.0, &u) {
                sum += (s.f.r * abs_cos_theta(&s.wi) / s.pdf) as f64;
            }
        }
        let estimate = sum / n as f64;
        assert!((estimate - albedo as f64).abs() < 5e-3, "estimate = {estimate}");
    }

    #[test]
    fn opposite_hemispheres_evaluate_to_black() {
        let bxdf = DiffuseBxDF::new(Spectrum::new(0.5));
        let wo = Vector3f::new(0.0, 0.0, 1.0);
        let wi = Vector3f::new(0.0, 0.0, -1.0);
        assert!(bxdf.f(&wo, &wi).is_black());
        assert_eq!(bxdf.pdf(&wo, &wi), 0.0);
    }

    #[test]
    fn sampler_and_pdf_agree() {
        let bxdf = DiffuseBxDF::new(Spectrum::new(0.5));
        let wo = Vector3f::new(0.3, -0.4, 0.8).normalize();
        let mut rng = RNG::new(2);
        for _ in 0..1000 {
            let u = Point2f::new(rng.uniform_float(), rng.uniform_float());
            let s = bxdf.sample_f(&wo, 0.0, &u).unwrap();
            let pdf = bxdf.pdf(&wo, &s.wi);
            assert!((pdf - s.pdf).abs() < 1e-5);
        }
    }
}
