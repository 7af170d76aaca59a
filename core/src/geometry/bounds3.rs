//! Axis-aligned bounding boxes.

use super::point3::Point3f;
use super::ray::Ray;
use super::vector3::Vector3f;
use crate::base::*;
use std::fmt;

/// An axis-aligned bounding box described by its minimum and maximum
/// corner points.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds3f {
    /// Minimum corner.
    pub p_min: Point3f,

    /// Maximum corner.
    pub p_max: Point3f,
}

impl Default for Bounds3f {
    /// Returns the empty bounding box (inverted corners), which behaves as
    /// the identity for `union`.
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Bounds3f {
    /// Empty bounding box with corners at opposite infinities so that any
    /// union with it yields the other operand.
    pub const EMPTY: Self = Self {
        p_min: Point3f::new(INFINITY, INFINITY, INFINITY),
        p_max: Point3f::new(-INFINITY, -INFINITY, -INFINITY),
    };

    /// Creates a new bounding box from two corner points.
    ///
    /// * `p1` - First corner.
    /// * `p2` - Second corner.
    pub fn new(p1: Point3f, p2: Point3f) -> Self {
        Self {
            p_min: p1.min(&p2),
            p_max: p1.max(&p2),
        }
    }

    /// Creates a degenerate bounding box containing a single point.
    ///
    /// * `p` - The point.
    pub fn from_point(p: Point3f) -> Self {
        Self { p_min: p, p_max: p }
    }

    /// Returns the union with another bounding box.
    ///
    /// * `other` - The other bounding box.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            p_min: self.p_min.min(&other.p_min),
            p_max: self.p_max.max(&other.p_max),
        }
    }

    /// Returns the union with a point.
    ///
    /// * `p` - The point.
    pub fn union_point(&self, p: &Point3f) -> Self {
        Self {
            p_min: self.p_min.min(p),
            p_max: self.p_max.max(p),
        }
    }

    /// Returns the vector across the box's diagonal.
    pub fn diagonal(&self) -> Vector3f {
        self.p_max - self.p_min
    }

    /// Returns the surface area of the box's faces.
    pub fn surface_area(&self) -> Float {
        let d = self.diagonal();
        2.0 * (d.x * d.y + d.y * d.z + d.z * d.x)
    }

    /// Returns the center point of the box.
    pub fn center(&self) -> Point3f {
        self.p_min + (self.p_max - self.p_min) * 0.5
    }

    /// Returns a box grown by a margin on all sides.
    ///
    /// * `margin` - The margin.
    pub fn expanded(&self, margin: Vector3f) -> Self {
        Self {
            p_min: self.p_min - margin,
            p_max: self.p_max + margin,
        }
    }

    /// Returns true if the point lies inside the box (boundary included).
    ///
    /// * `p` - The point.
    pub fn contains_point(&self, p: &Point3f) -> bool {
        p.x >= self.p_min.x
            && p.x <= self.p_max.x
            && p.y >= self.p_min.y
            && p.y <= self.p_max.y
            && p.z >= self.p_min.z
            && p.z <= self.p_max.z
    }

    /// Returns true if this box fully contains another box.
    ///
    /// * `other` - The other bounding box.
    pub fn contains(&self, other: &Self) -> bool {
        self.p_min.x <= other.p_min.x
            && self.p_min.y <= other.p_min.y
            && self.p_min.z <= other.p_min.z
            && self.p_max.x >= other.p_max.x
            && self.p_max.y >= other.p_max.y
            && self.p_max.z >= other.p_max.z
    }

    /// Returns true if this box overlaps another box.
    ///
    /// * `other` - The other bounding box.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.p_min.x <= other.p_max.x
            && self.p_max.x >= other.p_min.x
            && self.p_min.y <= other.p_max.y
            && self.p_max.y >= other.p_min.y
            && self.p_min.z <= other.p_max.z
            && self.p_max.z >= other.p_min.z
    }

    /// Slab test: returns true if the ray passes through the box within the
    /// parametric interval `[t_min, t_max]`. A ray lying exactly in a slab
    /// plane produces NaN interval endpoints whose comparisons fail, which
    /// conservatively keeps the box.
    ///
    /// * `ray`   - The ray.
    /// * `t_min` - Minimum parametric distance.
    /// * `t_max` - Maximum parametric distance.
    pub fn intersect_p(&self, ray: &Ray, t_min: Float, t_max: Float) -> bool {
        let mut t0 = t_min;
        let mut t1 = t_max;

        for axis in 0..3 {
            let inv_d = 1.0 / ray.d[axis];
            let mut t_near = (self.p_min[axis] - ray.o[axis]) * inv_d;
            let mut t_far = (self.p_max[axis] - ray.o[axis]) * inv_d;
            if inv_d < 0.0 {
                std::mem::swap(&mut t_near, &mut t_far);
            }

            t0 = if t_near > t0 { t_near } else { t0 };
            t1 = if t_far < t1 { t_far } else { t1 };
            if t1 < t0 {
                return false;
            }
        }

        true
    }
}

impl fmt::Display for Bounds3f {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} .. {}]", self.p_min, self.p_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Bounds3f {
        Bounds3f::new(Point3f::ZERO, Point3f::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn union_with_empty_is_identity() {
        let b = unit_box();
        assert_eq!(Bounds3f::EMPTY.union(&b), b);
        assert_eq!(b.union(&Bounds3f::EMPTY), b);
    }

    #[test]
    fn surface_area_of_unit_box() {
        assert_eq!(unit_box().surface_area(), 6.0);
    }

    #[test]
    fn containment() {
        let b = unit_box();
        assert!(b.contains_point(&Point3f::new(0.5, 0.5, 0.5)));
        assert!(b.contains_point(&Point3f::new(1.0, 1.0, 1.0)));
        assert!(!b.contains_point(&Point3f::new(1.5, 0.5, 0.5)));
        assert!(b.contains(&Bounds3f::new(
            Point3f::new(0.25, 0.25, 0.25),
            Point3f::new(0.75, 0.75, 0.75),
        )));
        assert!(!b.contains(&b.expanded(Vector3f::new(0.1, 0.1, 0.1))));
    }

    #[test]
    fn slab_test_hits_and_misses() {
        let b = unit_box();
        let hit = Ray::new(Point3f::new(0.5, 0.5, -1.0), Vector3f::Z_AXIS);
        let miss = Ray::new(Point3f::new(2.0, 0.5, -1.0), Vector3f::Z_AXIS);
        let behind = Ray::new(Point3f::new(0.5, 0.5, 2.0), Vector3f::Z_AXIS);
        assert!(b.intersect_p(&hit, 0.0, INFINITY));
        assert!(!b.intersect_p(&miss, 0.0, INFINITY));
        assert!(!b.intersect_p(&behind, 0.0, INFINITY));
    }

    #[test]
    fn slab_test_respects_interval() {
        let b = unit_box();
        let ray = Ray::new(Point3f::new(0.5, 0.5, -2.0), Vector3f::Z_AXIS);
        assert!(b.intersect_p(&ray, 0.0, 10.0));
        assert!(!b.intersect_p(&ray, 0.0, 1.0));
    }
}
