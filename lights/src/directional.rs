//! Directional light source.

use crate::LightSample;
use core::base::*;
use core::geometry::*;
use core::interaction::Intersection;
use core::sampling::concentric_sample_disk;
use core::spectrum::Spectrum;

/// A distant light arriving from one direction, softened by jittering the
/// sampled direction inside a small visible radius. A delta light.
pub struct DirectionalLight {
    /// Normalized direction the light travels.
    pub dir: Vector3f,

    /// Incident radiance.
    pub intensity: Spectrum,

    /// Angular jitter radius; zero gives hard shadows.
    pub radius: Float,
}

impl DirectionalLight {
    /// Create a new `DirectionalLight`.
    ///
    /// * `dir`       - Direction the light travels (normalized internally).
    /// * `intensity` - Incident radiance.
    /// * `radius`    - Angular jitter radius.
    pub fn new(dir: Vector3f, intensity: Spectrum, radius: Float) -> Self {
        Self {
            dir: dir.normalize(),
            intensity,
            radius,
        }
    }

    /// Return the radiance arriving from the (jittered) light direction.
    /// The visibility bound is unbounded: any occluder along the ray
    /// blocks the sun.
    ///
    /// * `ref_isect` - Intersection at the point being illuminated.
    /// * `u`         - The 2-D uniform random values for the jitter.
    pub fn sample_li(&self, _ref_isect: &Intersection, u: &Point2f) -> LightSample {
        let wi = if self.radius > 0.0 {
            let d = concentric_sample_disk(u);
            let frame = Frame::from_z(-self.dir);
            frame
                .to_world(&Vector3f::new(d.x * self.radius, d.y * self.radius, 1.0))
                .normalize()
        } else {
            -self.dir
        };

        LightSample {
            wi,
            pdf: 1.0,
            visibility: INFINITY,
            li: self.intensity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::rng::RNG;

    #[test]
    fn hard_light_points_against_travel_direction() {
        let light = DirectionalLight::new(Vector3f::new(0.0, -1.0, 0.0), Spectrum::ONE, 0.0);
        let s = light.sample_li(&Intersection::default(), &Point2f::new(0.3, 0.7));
        assert!((s.wi - Vector3f::Y_AXIS).length() < 1e-6);
        assert_eq!(s.visibility, INFINITY);
    }

    #[test]
    fn jittered_directions_stay_near_the_axis() {
        let light = DirectionalLight::new(Vector3f::new(0.0, -1.0, 0.0), Spectrum::ONE, 0.05);
        let mut rng = RNG::new(1);
        for _ in 0..200 {
            let u = Point2f::new(rng.uniform_float(), rng.uniform_float());
            let s = light.sample_li(&Intersection::default(), &u);
            assert!(s.wi.dot(&Vector3f::Y_AXIS) > 0.99);
            assert!((s.wi.length() - 1.0).abs() < 1e-5);
        }
    }
}
