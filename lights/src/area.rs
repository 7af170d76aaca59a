//! Area light source.

use crate::LightSample;
use core::base::*;
use core::geometry::*;
use core::interaction::Intersection;
use shapes::Primitive;
use std::sync::Arc;

/// Emission coupled to one scene primitive through its emissive material.
/// Sampling projects the primitive's surface onto the solid angle at the
/// reference point; the material decides sidedness and the emitted
/// spectrum.
pub struct AreaLight {
    /// The emitting primitive. The scene also holds this primitive in its
    /// primitive list under `primitive_index`.
    pub primitive: Arc<Primitive>,

    /// Index of the primitive in the scene's primitive list, used to
    /// recognize BSDF-sampled rays that land on this light.
    pub primitive_index: u32,
}

impl AreaLight {
    /// Create a new `AreaLight`.
    ///
    /// * `primitive`       - The emitting primitive.
    /// * `primitive_index` - Dense index of that primitive in the scene.
    pub fn new(primitive: Arc<Primitive>, primitive_index: u32) -> Self {
        Self {
            primitive,
            primitive_index,
        }
    }

    /// Sample a point on the emitting surface and return its radiance
    /// toward the reference point.
    ///
    /// * `ref_isect` - Intersection at the point being illuminated.
    /// * `u`         - The 2-D uniform random values.
    pub fn sample_li(&self, ref_isect: &Intersection, u: &Point2f) -> LightSample {
        let s = self.primitive.sample_toward(&ref_isect.point, u);
        if s.pdf == 0.0 {
            return LightSample::invalid();
        }

        let d = s.point - ref_isect.point;
        let distance_squared = d.length_squared();
        if distance_squared == 0.0 {
            return LightSample::invalid();
        }
        let distance = distance_squared.sqrt();
        let wi = d / distance;

        // Ask the material for the radiance leaving the sampled point
        // toward the receiver; sidedness lives in the material.
        let mut light_isect = Intersection::default();
        light_isect.point = s.point;
        light_isect.uv = s.uv;
        light_isect.normal = s.normal;
        light_isect.front_face = s.normal.dot(&-wi) > 0.0;
        let li = self.primitive.material().le(&light_isect, &-wi);

        LightSample {
            wi,
            pdf: s.pdf,
            visibility: distance - Ray::EPSILON,
            li,
        }
    }

    /// Density with which BSDF sampling along the ray would hit the
    /// emitting primitive.
    ///
    /// * `ray` - The ray toward the light.
    pub fn evaluate_pdf(&self, ray: &Ray) -> Float {
        self.primitive.evaluate_pdf(ray)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::material::Material;
    use core::rng::RNG;
    use core::spectrum::Spectrum;
    use core::texture::SpectrumTexture;
    use shapes::Sphere;

    fn emissive_sphere() -> AreaLight {
        let material = Arc::new(Material::DiffuseLight {
            emission: SpectrumTexture::Constant(Spectrum::new(4.0)),
            two_sided: false,
        });
        let primitive = Arc::new(Primitive::Sphere(Sphere::new(
            Point3f::new(0.0, 5.0, 0.0),
            1.0,
            material,
        )));
        AreaLight::new(primitive, 0)
    }

    #[test]
    fn samples_carry_radiance_and_distance_bound() {
        let light = emissive_sphere();
        let mut ref_isect = Intersection::default();
        ref_isect.point = Point3f::ZERO;

        let mut rng = RNG::new(2);
        for _ in 0..200 {
            let u = Point2f::new(rng.uniform_float(), rng.uniform_float());
            let s = light.sample_li(&ref_isect, &u);
            assert!(s.pdf > 0.0);
            assert_eq!(s.li, Spectrum::new(4.0));
            // The sampled point is on the near side of the sphere.
            assert!(s.visibility >= 4.0 - 1e-3 && s.visibility <= 6.0);
            assert!(s.wi.dot(&Vector3f::Y_AXIS) > 0.9);
        }
    }

    #[test]
    fn pdf_of_ray_toward_light_is_positive() {
        let light = emissive_sphere();
        let ray = Ray::new(Point3f::ZERO, Vector3f::Y_AXIS);
        assert!(light.evaluate_pdf(&ray) > 0.0);

        let miss = Ray::new(Point3f::ZERO, -Vector3f::Y_AXIS);
        assert_eq!(light.evaluate_pdf(&miss), 0.0);
    }
}
