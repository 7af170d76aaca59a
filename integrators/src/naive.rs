//! Naive path integrator.

use crate::{Integrator, Scene};
use core::base::*;
use core::geometry::*;
use core::sampler::Sampler;
use core::spectrum::Spectrum;

/// Recursive path tracer without next-event estimation or Russian
/// roulette: radiance is collected only when a BSDF-sampled ray happens to
/// hit an emitter. Much higher variance than `PathIntegrator` but trivially
/// correct, which makes it the reference for differential testing. Not the
/// shipped core.
pub struct NaivePathIntegrator {
    max_bounces: Int,
}

impl NaivePathIntegrator {
    /// Create a new `NaivePathIntegrator`.
    ///
    /// * `max_bounces` - Maximum number of scattering events per path.
    pub fn new(max_bounces: Int) -> Self {
        Self { max_bounces }
    }

    fn li_recursive(
        &self,
        scene: &Scene,
        ray: &Ray,
        sampler: &mut dyn Sampler,
        depth: Int,
    ) -> Spectrum {
        let isect = match scene.intersect(ray, Ray::EPSILON, INFINITY) {
            Some(isect) => isect,
            None => {
                let mut l = Spectrum::ZERO;
                for (_, light) in scene.infinite_lights() {
                    l += light.le(ray);
                }
                return l;
            }
        };

        let material = scene.primitive(isect.primitive).material();
        let wo = (-ray.d).normalize();
        let le = material.le(&isect, &wo);

        if depth >= self.max_bounces {
            return le;
        }

        let bsdf = match material.bsdf(&isect, &wo, sampler.next_1d()) {
            Some(bsdf) => bsdf,
            None => return le,
        };

        let u0 = sampler.next_1d();
        let u12 = sampler.next_2d();
        let sample = match bsdf.sample_f(&wo, u0, &u12) {
            Some(sample) => sample,
            None => return le,
        };

        let next_ray = Ray::new(isect.point, sample.wi);
        let li = self.li_recursive(scene, &next_ray, sampler, depth + 1);

        le + sample.f * sample.wi.abs_dot(&isect.shading.normal) * li / sample.pdf
    }
}

impl Integrator for NaivePathIntegrator {
    fn li(&self, scene: &Scene, ray: &Ray, sampler: &mut dyn Sampler) -> Spectrum {
        self.li_recursive(scene, ray, sampler, 0)
    }
}
