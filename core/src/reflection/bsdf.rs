//! BSDF

use super::*;
use crate::spectrum::Spectrum;

/// Binds a scattering model to the shading geometry at one surface point
/// and moves directions between world space and the local shading frame.
/// A plain stack value: building one allocates nothing.
#[derive(Copy, Clone, Debug)]
pub struct Bsdf {
    /// Local shading frame with the shading normal as z-axis.
    frame: Frame,

    /// The scattering model.
    bxdf: BxDF,
}

impl Bsdf {
    /// Create a new `Bsdf`.
    ///
    /// * `shading_normal`  - Shading normal at the surface point.
    /// * `shading_tangent` - Shading tangent at the surface point.
    /// * `bxdf`            - The scattering model.
    pub fn new(shading_normal: Vector3f, shading_tangent: Vector3f, bxdf: BxDF) -> Self {
        Self {
            frame: Frame::from_zx(shading_normal, shading_tangent),
            bxdf,
        }
    }

    /// Returns the lobe classification of the underlying model.
    pub fn flags(&self) -> BxDFFlags {
        self.bxdf.flags()
    }

    /// Evaluates the scattering function for a pair of world-space
    /// directions.
    ///
    /// * `wo_w` - Outgoing direction in world space.
    /// * `wi_w` - Incident direction in world space.
    pub fn f(&self, wo_w: &Vector3f, wi_w: &Vector3f) -> Spectrum {
        let wo = self.frame.to_local(wo_w);
        if wo.z == 0.0 {
            return Spectrum::ZERO;
        }
        let wi = self.frame.to_local(wi_w);
        self.bxdf.f(&wo, &wi)
    }

    /// Importance-samples a world-space incident direction.
    ///
    /// * `wo_w` - Outgoing direction in world space.
    /// * `u0`   - 1-D uniform random value.
    /// * `u12`  - 2-D uniform random values.
    pub fn sample_f(&self, wo_w: &Vector3f, u0: Float, u12: &Point2f) -> Option<BsdfSample> {
        let wo = self.frame.to_local(wo_w);
        if wo.z == 0.0 || self.bxdf.flags().is_empty() {
            return None;
        }

        let mut sample = self.bxdf.sample_f(&wo, u0, u12)?;
        if sample.f.is_black() || sample.pdf == 0.0 {
            return None;
        }

        sample.wi = self.frame.to_world(&sample.wi);
        Some(sample)
    }

    /// Evaluates the sampling density for a pair of world-space directions.
    ///
    /// * `wo_w` - Outgoing direction in world space.
    /// * `wi_w` - Incident direction in world space.
    pub fn pdf(&self, wo_w: &Vector3f, wi_w: &Vector3f) -> Float {
        let wo = self.frame.to_local(wo_w);
        if wo.z == 0.0 {
            return 0.0;
        }
        let wi = self.frame.to_local(wi_w);
        self.bxdf.pdf(&wo, &wi)
    }

    /// Widens near-specular distributions (see `BxDF::regularize`).
    pub fn regularize(&mut self) {
        self.bxdf.regularize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point2f;
    use crate::rng::RNG;

    #[test]
    fn sampled_directions_leave_the_surface() {
        let n = Vector3f::new(0.0, 1.0, 0.0);
        let bsdf = Bsdf::new(
            n,
            Vector3f::X_AXIS,
            BxDF::Diffuse(DiffuseBxDF::new(Spectrum::new(0.5))),
        );
        let wo = Vector3f::new(0.0, 1.0, 1.0).normalize();
        let mut rng = RNG::new(3);
        for _ in 0..100 {
            let u = Point2f::new(rng.uniform_float(), rng.uniform_float());
            let s = bsdf.sample_f(&wo, 0.5, &u).unwrap();
            assert!(s.wi.dot(&n) > 0.0);
            assert!((s.wi.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn world_space_f_matches_local_evaluation() {
        let n = Vector3f::new(1.0, 1.0, 0.0).normalize();
        let bsdf = Bsdf::new(
            n,
            Vector3f::Z_AXIS,
            BxDF::Diffuse(DiffuseBxDF::new(Spectrum::new(0.8))),
        );
        let wo = n;
        let wi = Vector3f::new(1.0, 0.9, 0.1).normalize();
        let f = bsdf.f(&wo, &wi);
        // Same hemisphere: Lambertian value is albedo / pi.
        assert!((f.r - 0.8 * INV_PI).abs() < 1e-6);
    }
}
