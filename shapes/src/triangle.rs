//! Mesh triangles.

use crate::mesh::Mesh;
use crate::primitive::PrimitiveSample;
use core::base::*;
use core::geometry::*;
use core::interaction::Intersection;
use core::sampling::uniform_sample_triangle;
use std::sync::Arc;

/// Padding applied to triangle bounding boxes so axis-aligned triangles
/// still have a box with volume.
const AABB_OFFSET: Float = 1e-3;

/// One triangle of a shared mesh, addressed by triangle index. Vertex data
/// is borrowed from the mesh; the triangle stores nothing of its own.
pub struct Triangle {
    /// The mesh holding the vertex data.
    pub mesh: Arc<Mesh>,

    /// Triangle index into the mesh's index list.
    pub index: u32,
}

impl Triangle {
    /// Create a new `Triangle`.
    ///
    /// * `mesh`  - The mesh holding the vertex data.
    /// * `index` - Triangle index into the mesh's index list.
    pub fn new(mesh: Arc<Mesh>, index: u32) -> Self {
        debug_assert!((index as usize) < mesh.triangle_count());
        Self { mesh, index }
    }

    fn vertex_indices(&self) -> [usize; 3] {
        let base = self.index as usize * 3;
        [
            self.mesh.indices[base] as usize,
            self.mesh.indices[base + 1] as usize,
            self.mesh.indices[base + 2] as usize,
        ]
    }

    fn positions(&self) -> [Point3f; 3] {
        let [i0, i1, i2] = self.vertex_indices();
        [
            self.mesh.positions[i0],
            self.mesh.positions[i1],
            self.mesh.positions[i2],
        ]
    }

    /// Returns the padded bounding box.
    pub fn aabb(&self) -> Bounds3f {
        let [p0, p1, p2] = self.positions();
        let offset = Vector3f::new(AABB_OFFSET, AABB_OFFSET, AABB_OFFSET);
        Bounds3f::new(p0.min(&p1).min(&p2), p0.max(&p1).max(&p2)).expanded(offset)
    }

    /// Surface area.
    pub fn area(&self) -> Float {
        let [p0, p1, p2] = self.positions();
        0.5 * (p1 - p0).cross(&(p2 - p0)).length()
    }

    /// Interpolates a vertex attribute with barycentric weights.
    fn interpolate_normal(&self, u: Float, v: Float, w: Float) -> Vector3f {
        let [i0, i1, i2] = self.vertex_indices();
        let n = w * self.mesh.normals[i0] + u * self.mesh.normals[i1] + v * self.mesh.normals[i2];
        n.normalize()
    }

    fn interpolate_tangent(&self, u: Float, v: Float, w: Float) -> Vector3f {
        let [i0, i1, i2] = self.vertex_indices();
        let t =
            w * self.mesh.tangents[i0] + u * self.mesh.tangents[i1] + v * self.mesh.tangents[i2];
        if t.length_squared() > 0.0 {
            t.normalize()
        } else {
            t
        }
    }

    fn interpolate_uv(&self, u: Float, v: Float, w: Float) -> Point2f {
        let [i0, i1, i2] = self.vertex_indices();
        let t0 = self.mesh.tex_coords[i0];
        let t1 = self.mesh.tex_coords[i1];
        let t2 = self.mesh.tex_coords[i2];
        w * t0 + u * t1 + v * t2
    }

    /// Möller-Trumbore intersection. Degenerate triangles and rays in the
    /// triangle plane yield no hit.
    ///
    /// * `ray`   - The ray.
    /// * `t_min` - Minimum parametric distance.
    /// * `t_max` - Maximum parametric distance.
    pub fn intersect(&self, ray: &Ray, t_min: Float, t_max: Float) -> Option<Intersection> {
        let (t, u, v) = self.intersect_barycentric(ray, t_min, t_max)?;
        let w = 1.0 - u - v;

        let [p0, p1, p2] = self.positions();
        let geometric_normal = (p1 - p0).cross(&(p2 - p0)).normalize();

        let mut isect = Intersection {
            t,
            point: ray.at(t),
            uv: self.interpolate_uv(u, v, w),
            ..Intersection::default()
        };
        isect.set_face_normal(
            &ray.d,
            geometric_normal,
            self.interpolate_normal(u, v, w),
            self.interpolate_tangent(u, v, w),
        );
        Some(isect)
    }

    /// Returns true if the ray hits the triangle inside the interval.
    ///
    /// * `ray`   - The ray.
    /// * `t_min` - Minimum parametric distance.
    /// * `t_max` - Maximum parametric distance.
    pub fn intersect_any(&self, ray: &Ray, t_min: Float, t_max: Float) -> bool {
        self.intersect_barycentric(ray, t_min, t_max).is_some()
    }

    fn intersect_barycentric(
        &self,
        ray: &Ray,
        t_min: Float,
        t_max: Float,
    ) -> Option<(Float, Float, Float)> {
        let [p0, p1, p2] = self.positions();
        let e1 = p1 - p0;
        let e2 = p2 - p0;

        let pvec = ray.d.cross(&e2);
        let det = e1.dot(&pvec);

        // Zero-area triangle or ray parallel to the plane.
        if det.abs() < 1e-10 {
            return None;
        }
        let inv_det = 1.0 / det;

        let tvec = ray.o - p0;
        let u = tvec.dot(&pvec) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let qvec = tvec.cross(&e1);
        let v = ray.d.dot(&qvec) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = e2.dot(&qvec) * inv_det;
        if t < t_min || t > t_max {
            return None;
        }

        Some((t, u, v))
    }

    /// Uniformly samples a point on the triangle (area measure).
    ///
    /// * `u` - The 2-D uniform random values.
    pub fn sample(&self, u: &Point2f) -> PrimitiveSample {
        let [p0, p1, p2] = self.positions();
        let b = uniform_sample_triangle(u);
        let b2 = 1.0 - b.x - b.y;

        let point = Point3f::from(
            Vector3f::from(p0) * b.x + Vector3f::from(p1) * b.y + Vector3f::from(p2) * b2,
        );
        let normal = (p1 - p0).cross(&(p2 - p0)).normalize();

        PrimitiveSample {
            point,
            normal,
            uv: self.interpolate_uv(b.y, b2, b.x),
            pdf: 1.0 / self.area(),
        }
    }

    /// Samples a point and converts the density to the solid-angle measure
    /// at the reference point.
    ///
    /// * `ref_point` - The reference point being illuminated.
    /// * `u`         - The 2-D uniform random values.
    pub fn sample_toward(&self, ref_point: &Point3f, u: &Point2f) -> PrimitiveSample {
        let mut s = self.sample(u);

        let w = s.point - *ref_point;
        let distance_squared = w.length_squared();
        let cosine = s.normal.abs_dot(&w.normalize());
        s.pdf = if cosine > 1e-8 && distance_squared > 0.0 {
            distance_squared / (cosine * self.area())
        } else {
            // Edge-on to the reference point; the sample carries no
            // usable density.
            0.0
        };
        s
    }

    /// The solid-angle density of hitting this triangle with the given
    /// ray, consistent with `sample_toward`.
    ///
    /// * `hit_isect` - The intersection on the triangle.
    /// * `hit_ray`   - The ray that produced the intersection.
    pub fn pdf_value(&self, hit_isect: &Intersection, hit_ray: &Ray) -> Float {
        let distance_squared = hit_isect.t * hit_isect.t * hit_ray.d.length_squared();
        let cosine = hit_ray.d.abs_dot(&hit_isect.normal) / hit_ray.d.length();
        if cosine <= 1e-8 {
            return 0.0;
        }
        distance_squared / (cosine * self.area())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::material::Material;
    use core::rng::RNG;
    use core::spectrum::Spectrum;
    use core::texture::SpectrumTexture;

    fn single_triangle() -> Triangle {
        let mesh = Arc::new(Mesh::new(
            vec![
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(0.0, 1.0, 0.0),
            ],
            vec![0, 1, 2],
            Arc::new(Material::Diffuse {
                reflectance: SpectrumTexture::Constant(Spectrum::new(0.5)),
            }),
        ));
        Triangle::new(mesh, 0)
    }

    #[test]
    fn hit_inside_miss_outside() {
        let tri = single_triangle();
        let hit = Ray::new(Point3f::new(0.25, 0.25, 1.0), -Vector3f::Z_AXIS);
        let miss = Ray::new(Point3f::new(0.9, 0.9, 1.0), -Vector3f::Z_AXIS);

        let isect = tri.intersect(&hit, Ray::EPSILON, INFINITY).unwrap();
        assert!((isect.t - 1.0).abs() < 1e-5);
        assert!((isect.normal - Vector3f::Z_AXIS).length() < 1e-5);
        assert!(tri.intersect(&miss, Ray::EPSILON, INFINITY).is_none());
    }

    #[test]
    fn parallel_ray_is_a_miss_not_an_error() {
        let tri = single_triangle();
        let ray = Ray::new(Point3f::new(0.0, 0.0, 1.0), Vector3f::X_AXIS);
        assert!(tri.intersect(&ray, Ray::EPSILON, INFINITY).is_none());
        assert!(!tri.intersect_any(&ray, Ray::EPSILON, INFINITY));
    }

    #[test]
    fn degenerate_triangle_is_a_miss() {
        let mesh = Arc::new(Mesh::new(
            vec![
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(2.0, 0.0, 0.0),
            ],
            vec![0, 1, 2],
            Arc::new(Material::Diffuse {
                reflectance: SpectrumTexture::Constant(Spectrum::new(0.5)),
            }),
        ));
        let tri = Triangle::new(mesh, 0);
        let ray = Ray::new(Point3f::new(0.5, 0.0, 1.0), -Vector3f::Z_AXIS);
        assert!(tri.intersect(&ray, Ray::EPSILON, INFINITY).is_none());
    }

    #[test]
    fn area_and_samples() {
        let tri = single_triangle();
        assert!((tri.area() - 0.5).abs() < 1e-6);

        let mut rng = RNG::new(13);
        for _ in 0..500 {
            let u = Point2f::new(rng.uniform_float(), rng.uniform_float());
            let s = tri.sample(&u);
            // Sampled points lie in the triangle's plane and bounds.
            assert!(s.point.z.abs() < 1e-6);
            assert!(s.point.x >= -1e-6 && s.point.y >= -1e-6);
            assert!(s.point.x + s.point.y <= 1.0 + 1e-5);
        }
    }

    #[test]
    fn solid_angle_pdf_matches_geometry() {
        let tri = single_triangle();
        let ref_point = Point3f::new(0.25, 0.25, 4.0);
        let mut rng = RNG::new(14);

        for _ in 0..100 {
            let u = Point2f::new(rng.uniform_float(), rng.uniform_float());
            let s = tri.sample_toward(&ref_point, &u);
            assert!(s.pdf > 0.0);

            // Shooting a ray at the sampled point must reproduce the pdf.
            let ray = Ray::new(ref_point, s.point - ref_point);
            let isect = tri.intersect(&ray, Ray::EPSILON, INFINITY).unwrap();
            let pdf2 = tri.pdf_value(&isect, &ray);
            assert!((s.pdf - pdf2).abs() < 1e-2 * s.pdf.max(1.0));
        }
    }
}
