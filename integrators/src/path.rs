//! Path integrator.

use crate::{Integrator, Scene};
use core::base::*;
use core::geometry::*;
use core::sampler::Sampler;
use core::sampling::power_heuristic;
use core::spectrum::Spectrum;

/// Unidirectional path tracer. At every non-specular vertex it combines a
/// next-event-estimation sample against one sampled light with the BSDF
/// sample that continues the path, weighted by the power heuristic, and
/// terminates stochastically by Russian roulette once the path is past
/// `min_bounces`. Unbiased for any `rr_probability` in (0, 1].
pub struct PathIntegrator {
    max_bounces: Int,
    min_bounces: Int,
    rr_probability: Float,
    regularize_bsdf: bool,
}

impl PathIntegrator {
    /// Create a new `PathIntegrator`.
    ///
    /// * `max_bounces`     - Maximum number of scattering events per path.
    /// * `regularize_bsdf` - Widen near-specular BSDFs after the first
    ///                       non-specular bounce to reduce fireflies.
    /// * `rr_probability`  - Upper bound for the Russian roulette survival
    ///                       probability.
    pub fn new(max_bounces: Int, regularize_bsdf: bool, rr_probability: Float) -> Self {
        Self {
            max_bounces,
            min_bounces: 2,
            rr_probability,
            regularize_bsdf,
        }
    }
}

impl Integrator for PathIntegrator {
    fn li(&self, scene: &Scene, primary_ray: &Ray, sampler: &mut dyn Sampler) -> Spectrum {
        let mut bounce: Int = 0;
        let mut l = Spectrum::ZERO;
        let mut throughput = Spectrum::ONE;
        let mut specular_bounce = false;
        let mut any_non_specular_bounces = false;
        let mut eta_scale: Float = 1.0;
        let mut ray = *primary_ray;
        let mut prev_bsdf_pdf: Float = 0.0;

        loop {
            let isect = match scene.intersect(&ray, Ray::EPSILON, INFINITY) {
                Some(isect) => isect,
                None => {
                    // The ray escaped; infinite lights contribute either
                    // unweighted (nothing to combine with) or MIS-weighted
                    // against the BSDF sample that got here.
                    if bounce == 0 || specular_bounce {
                        for (_, light) in scene.infinite_lights() {
                            l += throughput * light.le(&ray);
                        }
                    } else {
                        for (_, light) in scene.infinite_lights() {
                            let light_pdf =
                                light.evaluate_pdf(&ray) * scene.light_sampler().evaluate_pmf();
                            let mis_weight = power_heuristic(1, prev_bsdf_pdf, 1, light_pdf);
                            l += throughput * mis_weight * light.le(&ray);
                        }
                    }
                    break;
                }
            };

            let primitive = scene.primitive(isect.primitive);
            let material = primitive.material();
            let wo = (-ray.d).normalize();

            // Emitted radiance at the hit. Weighted 1 when there is no
            // light-sampling estimate to pair with; otherwise combined
            // with the previous bounce's BSDF pdf.
            let le = material.le(&isect, &wo);
            if !le.is_black() {
                match scene.area_light_index(isect.primitive) {
                    None => l += throughput * le,
                    Some(_) if bounce == 0 || specular_bounce => l += throughput * le,
                    Some(_) => {
                        let light_pdf = primitive.pdf_value(&isect, &ray)
                            * scene.light_sampler().evaluate_pmf();
                        let mis_weight = power_heuristic(1, prev_bsdf_pdf, 1, light_pdf);
                        l += throughput * mis_weight * le;
                    }
                }
            }

            if bounce >= self.max_bounces {
                break;
            }
            bounce += 1;

            // The BSDF is a stack value; per-bounce scratch storage is
            // scope-bound and costs no heap traffic.
            let mut bsdf = match material.bsdf(&isect, &wo, sampler.next_1d()) {
                Some(bsdf) => bsdf,
                None => break,
            };

            if self.regularize_bsdf && any_non_specular_bounces {
                bsdf.regularize();
            }

            // Next-event estimation, skipped for perfectly specular
            // surfaces where the light sample can never be evaluated.
            if bsdf.flags().is_non_specular() {
                let u0 = sampler.next_1d();
                let u12 = sampler.next_2d();
                if let Some(sampled_light) = scene.light_sampler().sample(u0) {
                    let light = scene.light(sampled_light.index);
                    let light_sample = light.sample_li(&isect, &u12);
                    let bsdf_pdf = bsdf.pdf(&wo, &light_sample.wi);
                    if !light_sample.li.is_black() && light_sample.pdf > 0.0 && bsdf_pdf > 0.0 {
                        let shadow_ray = Ray::new(isect.point, light_sample.wi);
                        if !scene.intersect_any(&shadow_ray, Ray::EPSILON, light_sample.visibility)
                        {
                            let light_pdf = light_sample.pdf / sampled_light.weight;
                            let f_cos = bsdf.f(&wo, &light_sample.wi)
                                * light_sample.wi.abs_dot(&isect.shading.normal);
                            if light.is_delta_light() {
                                // No BSDF sample can hit a delta light, so
                                // the light sample carries full weight.
                                l += throughput * light_sample.li * f_cos / light_pdf;
                            } else {
                                let mis_weight = power_heuristic(1, light_pdf, 1, bsdf_pdf);
                                l += throughput * mis_weight * light_sample.li * f_cos / light_pdf;
                            }
                        }
                    }
                }
            }

            // Sample the BSDF for the next path direction.
            let u0 = sampler.next_1d();
            let u12 = sampler.next_2d();
            let bsdf_sample = match bsdf.sample_f(&wo, u0, &u12) {
                Some(sample) => sample,
                None => break,
            };

            specular_bounce = bsdf_sample.is_specular();
            any_non_specular_bounces |= !bsdf_sample.is_specular();
            if bsdf_sample.is_transmission() {
                eta_scale *= sqr(bsdf_sample.eta);
            }

            // Save the pdf for MIS against whatever this ray hits next.
            prev_bsdf_pdf = bsdf_sample.pdf;
            throughput *= bsdf_sample.f * bsdf_sample.wi.abs_dot(&isect.shading.normal)
                / bsdf_sample.pdf;
            debug_assert!(throughput.luminance() >= 0.0);
            ray = Ray::new(isect.point, bsdf_sample.wi);

            // Russian roulette, skipped on specular samples whose
            // throughput is transient. eta_scale removes the radiance
            // compression of refractive chains from the survival estimate
            // so refracted paths are not killed unfairly.
            if !specular_bounce && bounce > self.min_bounces {
                let rr = min(self.rr_probability, throughput.luminance() * eta_scale);
                if rr <= 0.0 || sampler.next_1d() > rr {
                    break;
                }
                throughput *= 1.0 / rr;
            }

            debug!("bounce {bounce}: L = {l}, throughput = {throughput}");
        }

        l
    }
}
