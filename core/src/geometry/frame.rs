//! Orthonormal shading frames.

use super::vector3::{coordinate_system, Vector3f};

/// An orthonormal coordinate frame used to move directions between world
/// space and the local shading space where the z-axis is the surface
/// normal.
#[derive(Copy, Clone, Debug)]
pub struct Frame {
    /// First tangent axis.
    pub x: Vector3f,

    /// Second tangent axis.
    pub y: Vector3f,

    /// Normal axis.
    pub z: Vector3f,
}

impl Frame {
    /// Builds a frame around a z-axis, choosing arbitrary orthogonal
    /// tangents.
    ///
    /// * `z` - The normal axis (must be normalized).
    pub fn from_z(z: Vector3f) -> Self {
        let (x, y) = coordinate_system(&z);
        Self { x, y, z }
    }

    /// Builds a frame from a z-axis and a preferred tangent direction. The
    /// tangent is re-orthogonalized against the normal; a degenerate
    /// tangent falls back to an arbitrary one.
    ///
    /// * `z` - The normal axis (must be normalized).
    /// * `x` - The preferred tangent direction.
    pub fn from_zx(z: Vector3f, x: Vector3f) -> Self {
        let t = x - z * z.dot(&x);
        if t.length_squared() < 1e-12 {
            return Self::from_z(z);
        }
        let x = t.normalize();
        let y = z.cross(&x);
        Self { x, y, z }
    }

    /// Transforms a vector from world space into this frame.
    ///
    /// * `v` - The vector to transform.
    pub fn to_local(&self, v: &Vector3f) -> Vector3f {
        Vector3f::new(v.dot(&self.x), v.dot(&self.y), v.dot(&self.z))
    }

    /// Transforms a vector from this frame back into world space.
    ///
    /// * `v` - The vector to transform.
    pub fn to_world(&self, v: &Vector3f) -> Vector3f {
        self.x * v.x + self.y * v.y + self.z * v.z
    }
}
