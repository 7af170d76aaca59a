//! Surface intersections.

use crate::base::*;
use crate::geometry::*;

/// Sentinel primitive index meaning "not resolved against a scene". The
/// scene overwrites it with the dense index of the hit primitive after a
/// primitive-level test succeeds.
pub const INVALID_PRIMITIVE: u32 = u32::MAX;

/// Shading geometry at an intersection point. May differ from the true
/// geometric normal due to interpolated vertex normals.
#[derive(Copy, Clone, Debug, Default)]
pub struct Shading {
    /// Shading normal.
    pub normal: Vector3f,

    /// Shading tangent.
    pub tangent: Vector3f,
}

/// Geometric details of a ray-primitive intersection. Created on the stack
/// for each query and never persisted.
#[derive(Copy, Clone, Debug)]
pub struct Intersection {
    /// Parametric distance of the hit along the ray.
    pub t: Float,

    /// Hit point.
    pub point: Point3f,

    /// Geometric normal, flipped to face the incoming ray.
    pub normal: Vector3f,

    /// Shading geometry.
    pub shading: Shading,

    /// Texture coordinates.
    pub uv: Point2f,

    /// True if the ray hit the side the geometric normal points away from.
    pub front_face: bool,

    /// Index of the hit primitive in the owning scene's primitive list.
    pub primitive: u32,
}

impl Default for Intersection {
    fn default() -> Self {
        Self {
            t: 0.0,
            point: Point3f::ZERO,
            normal: Vector3f::ZERO,
            shading: Shading::default(),
            uv: Point2f::default(),
            front_face: true,
            primitive: INVALID_PRIMITIVE,
        }
    }
}

impl Intersection {
    /// Resolves the face orientation against the incoming ray direction and
    /// stores normals flipped so they oppose the ray.
    ///
    /// * `ray_d`           - The incoming ray direction.
    /// * `outward_normal`  - Geometric normal pointing out of the surface.
    /// * `shading_normal`  - Interpolated shading normal (outward).
    /// * `shading_tangent` - Shading tangent.
    pub fn set_face_normal(
        &mut self,
        ray_d: &Vector3f,
        outward_normal: Vector3f,
        shading_normal: Vector3f,
        shading_tangent: Vector3f,
    ) {
        self.front_face = ray_d.dot(&outward_normal) < 0.0;
        if self.front_face {
            self.normal = outward_normal;
            self.shading.normal = shading_normal;
            self.shading.tangent = shading_tangent;
        } else {
            self.normal = -outward_normal;
            self.shading.normal = -shading_normal;
            self.shading.tangent = -shading_tangent;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn back_face_flips_normals() {
        let mut isect = Intersection::default();
        let n = Vector3f::Z_AXIS;

        // Ray travelling along -z hits the front of a +z-facing surface.
        isect.set_face_normal(&-Vector3f::Z_AXIS, n, n, Vector3f::X_AXIS);
        assert!(isect.front_face);
        assert_eq!(isect.normal, n);

        // Ray travelling along +z hits the back.
        isect.set_face_normal(&Vector3f::Z_AXIS, n, n, Vector3f::X_AXIS);
        assert!(!isect.front_face);
        assert_eq!(isect.normal, -n);
        assert_eq!(isect.shading.normal, -n);
    }
}
