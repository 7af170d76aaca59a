//! Light sources and light sampling.

mod area;
mod directional;
mod infinite;
mod point;
mod sampler;

pub use area::*;
pub use directional::*;
pub use infinite::*;
pub use point::*;
pub use sampler::*;

use core::base::*;
use core::geometry::*;
use core::interaction::Intersection;
use core::spectrum::Spectrum;

/// A light sample toward a reference point: the direction to a virtual
/// point on the light, the distance bound a shadow ray must clear, the
/// incident radiance if unoccluded, and the solid-angle density of the
/// sample. A zero `pdf` marks an unusable sample.
#[derive(Copy, Clone, Debug)]
pub struct LightSample {
    /// Normalized direction from the reference point toward the light.
    pub wi: Vector3f,

    /// Sampling density with respect to solid angle at the reference
    /// point. Delta lights report 1.
    pub pdf: Float,

    /// Parametric distance bound for the occlusion test.
    pub visibility: Float,

    /// Incident radiance arriving along `wi`.
    pub li: Spectrum,
}

impl LightSample {
    /// An unusable sample (zero pdf).
    pub fn invalid() -> Self {
        Self {
            wi: Vector3f::ZERO,
            pdf: 0.0,
            visibility: 0.0,
            li: Spectrum::ZERO,
        }
    }
}

/// The closed set of light sources.
pub enum Light {
    /// Isotropic point light.
    Point(PointLight),

    /// Distant light with a small visible radius.
    Directional(DirectionalLight),

    /// Emission bound to one scene primitive.
    Area(AreaLight),

    /// Constant-radiance environment.
    Infinite(InfiniteLight),
}

impl Light {
    /// Importance-samples a direction from the reference point toward the
    /// light.
    ///
    /// * `ref_isect` - Intersection at the point being illuminated.
    /// * `u`         - The 2-D uniform random values.
    pub fn sample_li(&self, ref_isect: &Intersection, u: &Point2f) -> LightSample {
        match self {
            Light::Point(l) => l.sample_li(ref_isect, u),
            Light::Directional(l) => l.sample_li(ref_isect, u),
            Light::Area(l) => l.sample_li(ref_isect, u),
            Light::Infinite(l) => l.sample_li(ref_isect, u),
        }
    }

    /// The solid-angle density with which BSDF sampling from the ray
    /// origin would have generated a direction hitting this light. Must
    /// not be called for delta lights, which can never be hit by chance.
    ///
    /// * `ray` - The ray toward the light.
    pub fn evaluate_pdf(&self, ray: &Ray) -> Float {
        match self {
            Light::Point(_) | Light::Directional(_) => {
                debug_assert!(false, "evaluate_pdf called on a delta light");
                0.0
            }
            Light::Area(l) => l.evaluate_pdf(ray),
            Light::Infinite(l) => l.evaluate_pdf(ray),
        }
    }

    /// Radiance contributed to a ray that escaped the scene. Non-zero only
    /// for infinite lights.
    ///
    /// * `ray` - The escaped ray.
    pub fn le(&self, ray: &Ray) -> Spectrum {
        match self {
            Light::Infinite(l) => l.le(ray),
            _ => Spectrum::ZERO,
        }
    }

    /// Returns true for lights described by a delta distribution, which
    /// cannot be hit by BSDF sampling and skip the MIS combination.
    pub fn is_delta_light(&self) -> bool {
        matches!(self, Light::Point(_) | Light::Directional(_))
    }

    /// Returns true for infinite (environment) lights.
    pub fn is_infinite_light(&self) -> bool {
        matches!(self, Light::Infinite(_))
    }
}
