//! Smooth dielectric reflection and transmission.

use super::*;
use crate::spectrum::Spectrum;

/// A smooth dielectric boundary (glass, water). Both the reflected and the
/// refracted lobe are delta distributions; one of the two is chosen with a
/// probability proportional to its Fresnel weight.
#[derive(Copy, Clone, Debug)]
pub struct DielectricBxDF {
    /// Index of refraction of the interior relative to the exterior.
    eta: Float,
}

impl DielectricBxDF {
    /// Create a new `DielectricBxDF`.
    ///
    /// * `eta` - Index of refraction of the interior side.
    pub fn new(eta: Float) -> Self {
        Self { eta }
    }

    pub fn flags(&self) -> BxDFFlags {
        BxDFFlags::SPECULAR | BxDFFlags::REFLECTION | BxDFFlags::TRANSMISSION
    }

    pub fn f(&self, _wo: &Vector3f, _wi: &Vector3f) -> Spectrum {
        Spectrum::ZERO
    }

    pub fn sample_f(&self, wo: &Vector3f, u0: Float, _u12: &Point2f) -> Option<BsdfSample> {
        let cos_theta_o = cos_theta(wo);
        if cos_theta_o == 0.0 {
            return None;
        }

        // Index-matched boundaries pass light straight through.
        if self.eta == 1.0 {
            let wi = -*wo;
            let f = Spectrum::new(1.0 / abs_cos_theta(&wi));
            let mut sample =
                BsdfSample::new(f, wi, 1.0, BxDFFlags::SPECULAR | BxDFFlags::TRANSMISSION);
            sample.eta = 1.0;
            return Some(sample);
        }

        // Relative index of refraction along the ray and the normal on the
        // incident side.
        let (eta_p, n) = if cos_theta_o > 0.0 {
            (self.eta, Vector3f::Z_AXIS)
        } else {
            (1.0 / self.eta, -Vector3f::Z_AXIS)
        };

        // Total internal reflection forces the reflectance to one.
        let wt = refract(wo, &n, eta_p);
        let r = match wt {
            None => 1.0,
            Some(_) => fr_schlick_dielectric(cos_theta_o.abs(), eta_p),
        };

        if u0 < r {
            // Specular reflection, chosen with probability r.
            let wi = Vector3f::new(-wo.x, -wo.y, wo.z);
            let f = Spectrum::new(r / abs_cos_theta(&wi));
            Some(BsdfSample {
                f,
                wi,
                pdf: r,
                flags: BxDFFlags::SPECULAR | BxDFFlags::REFLECTION,
                eta: 1.0,
            })
        } else {
            // Specular transmission, chosen with probability 1 - r. The
            // radiance compression factor 1/eta^2 accounts for the change
            // in solid angle across the boundary; the integrator's
            // eta_scale undoes it for Russian roulette.
            let wi = wt?;
            let t = 1.0 - r;
            let f = Spectrum::new(t / abs_cos_theta(&wi) / sqr(eta_p));
            Some(BsdfSample {
                f,
                wi,
                pdf: t,
                flags: BxDFFlags::SPECULAR | BxDFFlags::TRANSMISSION,
                eta: eta_p,
            })
        }
    }

    pub fn pdf(&self, _wo: &Vector3f, _wi: &Vector3f) -> Float {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reflection_branch_mirrors() {
        let bxdf = DielectricBxDF::new(1.5);
        let wo = Vector3f::new(0.5, 0.0, 0.8660254);
        // u0 = 0 always selects the reflection branch.
        let s = bxdf.sample_f(&wo, 0.0, &Point2f::new(0.0, 0.0)).unwrap();
        assert!(s.is_specular());
        assert!(!s.is_transmission());
        assert!((s.wi - Vector3f::new(-0.5, 0.0, 0.8660254)).length() < 1e-6);
    }

    #[test]
    fn transmission_branch_bends_and_reports_eta() {
        let bxdf = DielectricBxDF::new(1.5);
        let wo = Vector3f::new(0.5, 0.0, 0.8660254);
        // u0 = 1 - epsilon selects the transmission branch at this angle.
        let s = bxdf.sample_f(&wo, 0.999, &Point2f::new(0.0, 0.0)).unwrap();
        assert!(s.is_transmission());
        assert_eq!(s.eta, 1.5);
        assert!(s.wi.z < 0.0);
    }

    #[test]
    fn total_internal_reflection_always_reflects() {
        let bxdf = DielectricBxDF::new(1.5);
        // Grazing exit from the dense side.
        let wo = Vector3f::new(0.9, 0.0, -0.4359).normalize();
        for u0 in [0.0, 0.5, 0.999] {
            let s = bxdf.sample_f(&wo, u0, &Point2f::new(0.0, 0.0)).unwrap();
            assert!(!s.is_transmission());
            assert_eq!(s.pdf, 1.0);
        }
    }

    #[test]
    fn index_matched_passes_through() {
        let bxdf = DielectricBxDF::new(1.0);
        let wo = Vector3f::new(0.3, 0.2, 0.93).normalize();
        let s = bxdf.sample_f(&wo, 0.5, &Point2f::new(0.0, 0.0)).unwrap();
        assert!(s.is_transmission());
        assert!((s.wi + wo).length() < 1e-6);
    }
}
