//! Camera boundary.
//!
//! Primary-ray generation is an external concern; this pinhole camera is
//! the minimal collaborator the render loop needs.

use core::base::*;
use core::geometry::*;

/// A pinhole perspective camera described by a position, a look-at target
/// and a vertical field of view.
pub struct PerspectiveCamera {
    origin: Point3f,
    lower_left: Point3f,
    horizontal: Vector3f,
    vertical: Vector3f,
}

impl PerspectiveCamera {
    /// Create a new `PerspectiveCamera`.
    ///
    /// * `look_from` - Camera position.
    /// * `look_at`   - Target point.
    /// * `up`        - World up vector.
    /// * `vfov`      - Vertical field of view in degrees.
    /// * `aspect`    - Film aspect ratio (width / height).
    pub fn new(
        look_from: Point3f,
        look_at: Point3f,
        up: Vector3f,
        vfov: Float,
        aspect: Float,
    ) -> Self {
        let theta = vfov.to_radians();
        let viewport_height = 2.0 * (theta / 2.0).tan();
        let viewport_width = aspect * viewport_height;

        let w = (look_from - look_at).normalize();
        let u = up.cross(&w).normalize();
        let v = w.cross(&u);

        let horizontal = u * viewport_width;
        let vertical = v * viewport_height;
        let lower_left = look_from - horizontal * 0.5 - vertical * 0.5 - w;

        Self {
            origin: look_from,
            lower_left,
            horizontal,
            vertical,
        }
    }

    /// Generates the primary ray through normalized film coordinates, with
    /// `(0, 0)` at the lower-left corner.
    ///
    /// * `s` - Horizontal film coordinate in [0, 1].
    /// * `t` - Vertical film coordinate in [0, 1].
    pub fn generate_ray(&self, s: Float, t: Float) -> Ray {
        let target = self.lower_left + self.horizontal * s + self.vertical * t;
        Ray::new(self.origin, target - self.origin)
    }
}
