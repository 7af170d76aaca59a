//! Point light source.

use crate::LightSample;
use core::base::*;
use core::geometry::*;
use core::interaction::Intersection;
use core::spectrum::Spectrum;

/// An isotropic point light emitting the same intensity in all directions.
/// A delta light: next-event estimation is the only way to collect its
/// contribution.
pub struct PointLight {
    /// Position.
    pub position: Point3f,

    /// Radiant intensity.
    pub intensity: Spectrum,
}

impl PointLight {
    /// Create a new `PointLight`.
    ///
    /// * `position`  - Position.
    /// * `intensity` - Radiant intensity.
    pub fn new(position: Point3f, intensity: Spectrum) -> Self {
        Self { position, intensity }
    }

    /// Return the radiance arriving at the reference point, attenuated by
    /// the inverse squared distance.
    ///
    /// * `ref_isect` - Intersection at the point being illuminated.
    /// * `u`         - Unused; the light is a delta distribution.
    pub fn sample_li(&self, ref_isect: &Intersection, _u: &Point2f) -> LightSample {
        let d = self.position - ref_isect.point;
        let distance_squared = d.length_squared();
        if distance_squared == 0.0 {
            return LightSample::invalid();
        }
        let distance = distance_squared.sqrt();

        LightSample {
            wi: d / distance,
            pdf: 1.0,
            visibility: distance,
            li: self.intensity / distance_squared,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverse_square_falloff() {
        let light = PointLight::new(Point3f::new(0.0, 2.0, 0.0), Spectrum::new(8.0));
        let mut isect = Intersection::default();
        isect.point = Point3f::ZERO;

        let s = light.sample_li(&isect, &Point2f::new(0.5, 0.5));
        assert_eq!(s.pdf, 1.0);
        assert!((s.wi - Vector3f::Y_AXIS).length() < 1e-6);
        assert!((s.visibility - 2.0).abs() < 1e-6);
        assert!((s.li.r - 2.0).abs() < 1e-6);
    }
}
