//! Primitive dispatch.

use crate::sphere::Sphere;
use crate::triangle::Triangle;
use core::base::*;
use core::geometry::*;
use core::interaction::Intersection;
use core::material::Material;
use std::sync::Arc;

/// A point sampled on a primitive's surface together with the density it
/// was drawn with. The measure of `pdf` depends on the sampling call:
/// area for `sample`, solid angle at the reference point for
/// `sample_toward`.
#[derive(Copy, Clone, Debug)]
pub struct PrimitiveSample {
    /// Sampled surface point.
    pub point: Point3f,

    /// Geometric normal at the sampled point.
    pub normal: Vector3f,

    /// Texture coordinates at the sampled point.
    pub uv: Point2f,

    /// Sampling density.
    pub pdf: Float,
}

/// The closed set of geometric primitives. Created once during scene
/// construction and immutable afterwards; BVH leaves and area lights refer
/// to primitives by index into the scene's list.
pub enum Primitive {
    Sphere(Sphere),
    Triangle(Triangle),
}

impl Primitive {
    /// Returns the primitive's bounding box.
    pub fn aabb(&self) -> Bounds3f {
        match self {
            Primitive::Sphere(s) => s.aabb(),
            Primitive::Triangle(t) => t.aabb(),
        }
    }

    /// Nearest-hit test over the parametric interval.
    ///
    /// * `ray`   - The ray.
    /// * `t_min` - Minimum parametric distance.
    /// * `t_max` - Maximum parametric distance.
    pub fn intersect(&self, ray: &Ray, t_min: Float, t_max: Float) -> Option<Intersection> {
        match self {
            Primitive::Sphere(s) => s.intersect(ray, t_min, t_max),
            Primitive::Triangle(t) => t.intersect(ray, t_min, t_max),
        }
    }

    /// Any-hit (occlusion) test over the parametric interval.
    ///
    /// * `ray`   - The ray.
    /// * `t_min` - Minimum parametric distance.
    /// * `t_max` - Maximum parametric distance.
    pub fn intersect_any(&self, ray: &Ray, t_min: Float, t_max: Float) -> bool {
        match self {
            Primitive::Sphere(s) => s.intersect_any(ray, t_min, t_max),
            Primitive::Triangle(t) => t.intersect_any(ray, t_min, t_max),
        }
    }

    /// Surface area.
    pub fn area(&self) -> Float {
        match self {
            Primitive::Sphere(s) => s.area(),
            Primitive::Triangle(t) => t.area(),
        }
    }

    /// Uniform area sampling.
    ///
    /// * `u` - The 2-D uniform random values.
    pub fn sample(&self, u: &Point2f) -> PrimitiveSample {
        match self {
            Primitive::Sphere(s) => s.sample(u),
            Primitive::Triangle(t) => t.sample(u),
        }
    }

    /// Solid-angle-projected sampling from a reference point.
    ///
    /// * `ref_point` - The reference point being illuminated.
    /// * `u`         - The 2-D uniform random values.
    pub fn sample_toward(&self, ref_point: &Point3f, u: &Point2f) -> PrimitiveSample {
        match self {
            Primitive::Sphere(s) => s.sample_toward(ref_point, u),
            Primitive::Triangle(t) => t.sample_toward(ref_point, u),
        }
    }

    /// Solid-angle density of generating the hit with `sample_toward`.
    ///
    /// * `hit_isect` - The intersection on this primitive.
    /// * `hit_ray`   - The ray that produced the intersection.
    pub fn pdf_value(&self, hit_isect: &Intersection, hit_ray: &Ray) -> Float {
        match self {
            Primitive::Sphere(s) => s.pdf_value(hit_isect, hit_ray),
            Primitive::Triangle(t) => t.pdf_value(hit_isect, hit_ray),
        }
    }

    /// Solid-angle density that a BSDF-sampled ray in this direction would
    /// have hit this primitive. Zero when the ray misses.
    ///
    /// * `ray` - The ray.
    pub fn evaluate_pdf(&self, ray: &Ray) -> Float {
        match self.intersect(ray, Ray::EPSILON, INFINITY) {
            Some(isect) => self.pdf_value(&isect, ray),
            None => 0.0,
        }
    }

    /// The material bound to the primitive.
    pub fn material(&self) -> &Arc<Material> {
        match self {
            Primitive::Sphere(s) => &s.material,
            Primitive::Triangle(t) => &t.mesh.material,
        }
    }
}
