//! Infinite (environment) light source.

use crate::LightSample;
use core::base::*;
use core::geometry::*;
use core::interaction::Intersection;
use core::sampling::{uniform_sample_sphere, uniform_sphere_pdf};
use core::spectrum::Spectrum;

/// A constant-radiance environment surrounding the scene. Every escaped
/// ray receives its radiance; sampling draws directions uniformly over the
/// sphere so the sampler and `evaluate_pdf` agree everywhere.
pub struct InfiniteLight {
    /// Radiance arriving from every direction.
    pub l: Spectrum,
}

impl InfiniteLight {
    /// Create a new `InfiniteLight`.
    ///
    /// * `l` - Radiance arriving from every direction.
    pub fn new(l: Spectrum) -> Self {
        Self { l }
    }

    /// Sample a direction toward the environment.
    ///
    /// * `ref_isect` - Intersection at the point being illuminated.
    /// * `u`         - The 2-D uniform random values.
    pub fn sample_li(&self, _ref_isect: &Intersection, u: &Point2f) -> LightSample {
        LightSample {
            wi: uniform_sample_sphere(u),
            pdf: uniform_sphere_pdf(),
            visibility: INFINITY,
            li: self.l,
        }
    }

    /// Density of sampling any direction; uniform over the sphere.
    ///
    /// * `ray` - The escaped ray.
    pub fn evaluate_pdf(&self, _ray: &Ray) -> Float {
        uniform_sphere_pdf()
    }

    /// Radiance contributed to an escaped ray.
    ///
    /// * `ray` - The escaped ray.
    pub fn le(&self, _ray: &Ray) -> Spectrum {
        self.l
    }
}
