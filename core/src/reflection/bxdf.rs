//! BxDF variants and samples.

use super::*;
use crate::spectrum::Spectrum;

bitflags::bitflags! {
    /// Classifies the lobes of a scattering function.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct BxDFFlags: u8 {
        const REFLECTION = 1 << 0;
        const TRANSMISSION = 1 << 1;
        const DIFFUSE = 1 << 2;
        const GLOSSY = 1 << 3;
        const SPECULAR = 1 << 4;
    }
}

impl BxDFFlags {
    /// Returns true if the flags contain any non-specular lobe, meaning the
    /// scattering function can be evaluated for arbitrary direction pairs
    /// and participates in light sampling.
    pub fn is_non_specular(&self) -> bool {
        self.intersects(Self::DIFFUSE | Self::GLOSSY)
    }

    /// Returns true if the flags describe a delta distribution.
    pub fn is_specular(&self) -> bool {
        self.contains(Self::SPECULAR)
    }
}

/// The result of importance-sampling a scattering function at one surface
/// point: the sampled incident direction, the function value, the density
/// the direction was drawn with, and bookkeeping for the integrator.
#[derive(Copy, Clone, Debug)]
pub struct BsdfSample {
    /// Value of the scattering function for the sampled pair.
    pub f: Spectrum,

    /// The sampled incident direction.
    pub wi: Vector3f,

    /// Probability density of the sample with respect to solid angle.
    pub pdf: Float,

    /// Lobe classification of the sampled direction.
    pub flags: BxDFFlags,

    /// Relative index of refraction for transmissive samples, 1 otherwise.
    pub eta: Float,
}

impl BsdfSample {
    /// Create a new `BsdfSample` for a non-transmissive lobe.
    pub fn new(f: Spectrum, wi: Vector3f, pdf: Float, flags: BxDFFlags) -> Self {
        Self { f, wi, pdf, flags, eta: 1.0 }
    }

    /// Returns true if the sample came from a delta lobe.
    pub fn is_specular(&self) -> bool {
        self.flags.is_specular()
    }

    /// Returns true if the sample crossed the surface boundary.
    pub fn is_transmission(&self) -> bool {
        self.flags.contains(BxDFFlags::TRANSMISSION)
    }
}

/// The closed set of scattering models. Dispatch is a match over the
/// variants; every variant implements the same `f`/`sample_f`/`pdf`
/// contract in the local shading frame.
#[derive(Copy, Clone, Debug)]
pub enum BxDF {
    /// Perfectly diffuse (Lambertian) reflection.
    Diffuse(DiffuseBxDF),

    /// Perfect mirror reflection.
    SpecularReflection(SpecularReflectionBxDF),

    /// Smooth dielectric reflection and transmission.
    Dielectric(DielectricBxDF),

    /// Rough conductor.
    Conductor(ConductorBxDF),

    /// Metallic/roughness mixture lobe.
    Principled(PrincipledBxDF),
}

impl BxDF {
    /// Returns the lobe classification.
    pub fn flags(&self) -> BxDFFlags {
        match self {
            BxDF::Diffuse(b) => b.flags(),
            BxDF::SpecularReflection(b) => b.flags(),
            BxDF::Dielectric(b) => b.flags(),
            BxDF::Conductor(b) => b.flags(),
            BxDF::Principled(b) => b.flags(),
        }
    }

    /// Evaluates the scattering function for a pair of directions in the
    /// local shading frame. Delta lobes evaluate to black.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn f(&self, wo: &Vector3f, wi: &Vector3f) -> Spectrum {
        match self {
            BxDF::Diffuse(b) => b.f(wo, wi),
            BxDF::SpecularReflection(b) => b.f(wo, wi),
            BxDF::Dielectric(b) => b.f(wo, wi),
            BxDF::Conductor(b) => b.f(wo, wi),
            BxDF::Principled(b) => b.f(wo, wi),
        }
    }

    /// Importance-samples an incident direction for the given outgoing
    /// direction. Returns `None` when no valid direction could be sampled.
    ///
    /// * `wo`  - Outgoing direction.
    /// * `u0`  - 1-D uniform random value for lobe selection.
    /// * `u12` - 2-D uniform random values.
    pub fn sample_f(&self, wo: &Vector3f, u0: Float, u12: &Point2f) -> Option<BsdfSample> {
        match self {
            BxDF::Diffuse(b) => b.sample_f(wo, u0, u12),
            BxDF::SpecularReflection(b) => b.sample_f(wo, u0, u12),
            BxDF::Dielectric(b) => b.sample_f(wo, u0, u12),
            BxDF::Conductor(b) => b.sample_f(wo, u0, u12),
            BxDF::Principled(b) => b.sample_f(wo, u0, u12),
        }
    }

    /// Evaluates the density `sample_f` would have drawn `wi` with. Delta
    /// lobes have no density and return zero.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn pdf(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        match self {
            BxDF::Diffuse(b) => b.pdf(wo, wi),
            BxDF::SpecularReflection(b) => b.pdf(wo, wi),
            BxDF::Dielectric(b) => b.pdf(wo, wi),
            BxDF::Conductor(b) => b.pdf(wo, wi),
            BxDF::Principled(b) => b.pdf(wo, wi),
        }
    }

    /// Widens near-specular distributions to suppress fireflies from
    /// caustic paths. No-op for lobes without a roughness parameter.
    pub fn regularize(&mut self) {
        match self {
            BxDF::Conductor(b) => b.regularize(),
            BxDF::Principled(b) => b.regularize(),
            BxDF::Diffuse(_) | BxDF::SpecularReflection(_) | BxDF::Dielectric(_) => {}
        }
    }
}
