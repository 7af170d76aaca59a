//! Rays.

use super::point3::Point3f;
use super::vector3::Vector3f;
use crate::base::*;
use std::fmt;

/// A semi-infinite line described by an origin and a direction. The
/// direction is not required to be normalized; parametric distances along
/// the ray are interpreted with respect to the direction's length.
#[derive(Copy, Clone, Debug, Default)]
pub struct Ray {
    /// Origin.
    pub o: Point3f,

    /// Direction.
    pub d: Vector3f,
}

impl Ray {
    /// Default minimum offset along a ray used to avoid self-intersection
    /// with the surface it was spawned from.
    pub const EPSILON: Float = 1e-4;

    /// Creates a new `Ray`.
    ///
    /// * `o` - Origin.
    /// * `d` - Direction.
    pub const fn new(o: Point3f, d: Vector3f) -> Self {
        Self { o, d }
    }

    /// Returns the point a parametric distance `t` along the ray.
    ///
    /// * `t` - Parametric distance.
    pub fn at(&self, t: Float) -> Point3f {
        self.o + self.d * t
    }
}

impl fmt::Display for Ray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[o: {}, d: {}]", self.o, self.d)
    }
}
