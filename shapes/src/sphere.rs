//! Spheres.

use crate::primitive::PrimitiveSample;
use core::base::*;
use core::geometry::*;
use core::interaction::Intersection;
use core::material::Material;
use core::sampling::uniform_sample_sphere;
use std::sync::Arc;

/// A sphere described by its center and radius. Unlike triangles it owns
/// its own parameters.
pub struct Sphere {
    /// Center.
    pub center: Point3f,

    /// Radius.
    pub radius: Float,

    /// Surface material.
    pub material: Arc<Material>,
}

impl Sphere {
    /// Create a new `Sphere`.
    ///
    /// * `center`   - Center.
    /// * `radius`   - Radius.
    /// * `material` - Surface material.
    pub fn new(center: Point3f, radius: Float, material: Arc<Material>) -> Self {
        Self { center, radius, material }
    }

    /// Returns the bounding box.
    pub fn aabb(&self) -> Bounds3f {
        let r = Vector3f::new(self.radius, self.radius, self.radius);
        Bounds3f::new(self.center - r, self.center + r)
    }

    /// Surface area.
    pub fn area(&self) -> Float {
        FOUR_PI * self.radius * self.radius
    }

    /// Solves the ray-sphere quadratic for the nearest root inside the
    /// interval.
    fn nearest_root(&self, ray: &Ray, t_min: Float, t_max: Float) -> Option<Float> {
        let oc = ray.o - self.center;
        let a = ray.d.length_squared();
        let b = 2.0 * oc.dot(&ray.d);
        let c = oc.length_squared() - self.radius * self.radius;

        let (t0, t1) = quadratic(a, b, c)?;

        // Take the nearest root that lies in the acceptable range.
        if t0 >= t_min && t0 <= t_max {
            Some(t0)
        } else if t1 >= t_min && t1 <= t_max {
            Some(t1)
        } else {
            None
        }
    }

    /// Returns geometric details if the ray intersects the sphere.
    ///
    /// * `ray`   - The ray.
    /// * `t_min` - Minimum parametric distance.
    /// * `t_max` - Maximum parametric distance.
    pub fn intersect(&self, ray: &Ray, t_min: Float, t_max: Float) -> Option<Intersection> {
        let root = self.nearest_root(ray, t_min, t_max)?;

        let mut isect = Intersection {
            t: root,
            point: ray.at(root),
            ..Intersection::default()
        };
        let outward_normal = (isect.point - self.center) / self.radius;

        // An arbitrary tangent; spheres have no authored tangent frame.
        let up = if outward_normal.y.abs() > 0.999 {
            Vector3f::X_AXIS
        } else {
            Vector3f::Y_AXIS
        };
        let outward_tangent = up.cross(&outward_normal).normalize();

        isect.set_face_normal(&ray.d, outward_normal, outward_normal, outward_tangent);
        isect.uv = Self::tex_coord(&outward_normal);

        Some(isect)
    }

    /// Returns true if the ray intersects the sphere.
    ///
    /// * `ray`   - The ray.
    /// * `t_min` - Minimum parametric distance.
    /// * `t_max` - Maximum parametric distance.
    pub fn intersect_any(&self, ray: &Ray, t_min: Float, t_max: Float) -> bool {
        self.nearest_root(ray, t_min, t_max).is_some()
    }

    /// Uniformly samples a point on the surface (area measure).
    ///
    /// * `u` - The 2-D uniform random values.
    pub fn sample(&self, u: &Point2f) -> PrimitiveSample {
        let normal = uniform_sample_sphere(u);
        let point = self.center + normal * self.radius;
        PrimitiveSample {
            point,
            normal,
            uv: Self::tex_coord(&normal),
            pdf: 1.0 / self.area(),
        }
    }

    /// Samples a point visible from a reference point by sampling the cone
    /// of directions subtended by the sphere (solid-angle measure).
    ///
    /// * `ref_point` - The reference point being illuminated.
    /// * `u`         - The 2-D uniform random values.
    pub fn sample_toward(&self, ref_point: &Point3f, u: &Point2f) -> PrimitiveSample {
        let direction = self.center - *ref_point;
        let distance_squared = direction.length_squared();

        if distance_squared <= self.radius * self.radius {
            // Reference point inside the sphere: fall back to an area
            // sample converted to the solid-angle measure.
            let mut s = self.sample(u);
            let w = s.point - *ref_point;
            let dist2 = w.length_squared();
            let cosine = s.normal.abs_dot(&w.normalize());
            s.pdf = if cosine > 0.0 && dist2 > 0.0 {
                dist2 / (cosine * self.area())
            } else {
                0.0
            };
            return s;
        }

        let distance = distance_squared.sqrt();
        let cos_theta_max = (1.0 - self.radius * self.radius / distance_squared).sqrt();

        // Sample a direction inside the subtended cone, expressed in a
        // frame whose z-axis points at the sphere's center.
        let phi = TWO_PI * u[0];
        let z = 1.0 + u[1] * (cos_theta_max - 1.0);
        let sin_theta = max(0.0, 1.0 - z * z).sqrt();
        let d_local = Vector3f::new(phi.cos() * sin_theta, phi.sin() * sin_theta, z);

        // Distance from the reference point to the sphere along the
        // sampled direction.
        let s = distance * z
            - max(
                0.0,
                self.radius * self.radius - distance_squared * sin_theta * sin_theta,
            )
            .sqrt();

        let frame = Frame::from_z(direction / distance);
        let ref2p = frame.to_world(&d_local) * s;

        let point = *ref_point + ref2p;
        let normal = (point - self.center).normalize();
        let solid_angle = TWO_PI * (1.0 - cos_theta_max);

        PrimitiveSample {
            point,
            normal,
            uv: Self::tex_coord(&normal),
            pdf: 1.0 / solid_angle,
        }
    }

    /// The solid-angle density with which `sample_toward` generates
    /// directions from the ray origin that hit this sphere.
    ///
    /// * `hit_isect` - The intersection on the sphere.
    /// * `hit_ray`   - The ray that produced the intersection.
    pub fn pdf_value(&self, hit_isect: &Intersection, hit_ray: &Ray) -> Float {
        let distance_squared = (self.center - hit_ray.o).length_squared();

        if distance_squared <= self.radius * self.radius {
            // Origin inside the sphere: the cone degenerates; convert the
            // area density instead.
            let dist2 = hit_isect.t * hit_isect.t * hit_ray.d.length_squared();
            let cosine = hit_ray.d.abs_dot(&hit_isect.normal) / hit_ray.d.length();
            if cosine <= 0.0 {
                return 0.0;
            }
            return dist2 / (cosine * self.area());
        }

        let cos_theta_max = (1.0 - self.radius * self.radius / distance_squared).sqrt();
        let solid_angle = TWO_PI * (1.0 - cos_theta_max);
        1.0 / solid_angle
    }

    /// Spherical texture coordinates for a point given by its unit normal.
    fn tex_coord(v: &Vector3f) -> Point2f {
        let theta = clamp(v.y, -1.0, 1.0).acos();
        let r = v.z.atan2(v.x);
        let phi = if r < 0.0 { r + TWO_PI } else { r };
        Point2f::new(phi * INV_TWO_PI, 1.0 - theta * INV_PI)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::rng::RNG;
    use core::spectrum::Spectrum;
    use core::texture::SpectrumTexture;

    fn sphere() -> Sphere {
        Sphere::new(
            Point3f::new(0.0, 0.0, 0.0),
            2.0,
            Arc::new(Material::Diffuse {
                reflectance: SpectrumTexture::Constant(Spectrum::new(0.5)),
            }),
        )
    }

    #[test]
    fn ray_hits_front_and_reports_t() {
        let s = sphere();
        let ray = Ray::new(Point3f::new(0.0, 0.0, 5.0), -Vector3f::Z_AXIS);
        let isect = s.intersect(&ray, Ray::EPSILON, INFINITY).unwrap();
        assert!((isect.t - 3.0).abs() < 1e-4);
        assert!(isect.front_face);
        assert!((isect.normal - Vector3f::Z_AXIS).length() < 1e-4);
        assert!(s.intersect_any(&ray, Ray::EPSILON, INFINITY));
    }

    #[test]
    fn ray_from_inside_hits_back_face() {
        let s = sphere();
        let ray = Ray::new(Point3f::ZERO, Vector3f::X_AXIS);
        let isect = s.intersect(&ray, Ray::EPSILON, INFINITY).unwrap();
        assert!(!isect.front_face);
        // Normal is flipped toward the ray origin.
        assert!((isect.normal + Vector3f::X_AXIS).length() < 1e-4);
    }

    #[test]
    fn miss_returns_none() {
        let s = sphere();
        let ray = Ray::new(Point3f::new(5.0, 5.0, 5.0), Vector3f::Z_AXIS);
        assert!(s.intersect(&ray, Ray::EPSILON, INFINITY).is_none());
        assert!(!s.intersect_any(&ray, Ray::EPSILON, INFINITY));
    }

    #[test]
    fn cone_samples_hit_the_sphere() {
        let s = sphere();
        let ref_point = Point3f::new(10.0, 0.0, 0.0);
        let mut rng = RNG::new(5);
        for _ in 0..500 {
            let u = Point2f::new(rng.uniform_float(), rng.uniform_float());
            let ps = s.sample_toward(&ref_point, &u);
            assert!(ps.pdf > 0.0);

            let wi = (ps.point - ref_point).normalize();
            let ray = Ray::new(ref_point, wi);
            assert!(
                s.intersect_any(&ray, Ray::EPSILON, INFINITY),
                "cone sample direction missed the sphere"
            );
        }
    }

    #[test]
    fn cone_pdf_matches_subtended_solid_angle() {
        let s = sphere();
        let ref_point = Point3f::new(0.0, 0.0, 10.0);
        let ray = Ray::new(ref_point, -Vector3f::Z_AXIS);
        let isect = s.intersect(&ray, Ray::EPSILON, INFINITY).unwrap();

        let cos_max = (1.0f32 - 4.0 / 100.0).sqrt();
        let expected = 1.0 / (TWO_PI * (1.0 - cos_max));
        assert!((s.pdf_value(&isect, &ray) - expected).abs() < 1e-4 * expected);
    }

    #[test]
    fn area_samples_lie_on_surface() {
        let s = sphere();
        let mut rng = RNG::new(6);
        for _ in 0..200 {
            let u = Point2f::new(rng.uniform_float(), rng.uniform_float());
            let ps = s.sample(&u);
            assert!((ps.point.distance(&s.center) - s.radius).abs() < 1e-3);
            assert!((ps.pdf - 1.0 / s.area()).abs() < 1e-9);
        }
    }
}
