//! Materials.

use crate::base::*;
use crate::geometry::*;
use crate::interaction::Intersection;
use crate::microfacet::{roughness_to_alpha, TrowbridgeReitzDistribution};
use crate::reflection::*;
use crate::spectrum::Spectrum;
use crate::texture::{FloatTexture, SpectrumTexture};
use std::sync::Arc;

/// The closed set of surface materials. A material maps the shading
/// geometry and surface parameters at an intersection to a `Bsdf` and an
/// emitted radiance.
#[derive(Clone, Debug)]
pub enum Material {
    /// Perfectly diffuse surface.
    Diffuse {
        reflectance: SpectrumTexture,
    },

    /// Perfect mirror.
    Mirror {
        reflectance: SpectrumTexture,
    },

    /// Smooth glass-like boundary.
    Dielectric {
        /// Index of refraction of the interior.
        ior: Float,
    },

    /// Rough conductor.
    Metal {
        f0: SpectrumTexture,
        roughness: FloatTexture,
    },

    /// Metallic/roughness workflow surface with optional emission.
    Principled {
        basecolor: SpectrumTexture,
        metallic: FloatTexture,
        roughness: FloatTexture,
        emissive: Option<SpectrumTexture>,
    },

    /// Pure emitter; terminates paths that hit it.
    DiffuseLight {
        emission: SpectrumTexture,
        two_sided: bool,
    },

    /// Stochastic blend of two materials.
    Mix {
        a: Arc<Material>,
        b: Arc<Material>,
        amount: FloatTexture,
    },
}

impl Material {
    /// Emitted radiance leaving the surface toward the viewer. Black for
    /// non-emissive materials. Sidedness is resolved through the
    /// intersection's face flag.
    ///
    /// * `isect` - The intersection on the surface.
    pub fn le(&self, isect: &Intersection, _wo: &Vector3f) -> Spectrum {
        match self {
            Material::DiffuseLight { emission, two_sided } => {
                if *two_sided || isect.front_face {
                    emission.evaluate(&isect.uv)
                } else {
                    Spectrum::ZERO
                }
            }
            Material::Principled { emissive: Some(emissive), .. } => emissive.evaluate(&isect.uv),
            _ => Spectrum::ZERO,
        }
    }

    /// Returns true if the material emits light from some direction; used
    /// by scene construction to attach area lights.
    pub fn is_emissive(&self) -> bool {
        match self {
            Material::DiffuseLight { .. } => true,
            Material::Principled { emissive, .. } => emissive.is_some(),
            Material::Mix { a, b, .. } => a.is_emissive() || b.is_emissive(),
            _ => false,
        }
    }

    /// Builds the scattering function at an intersection. Returns `None`
    /// for materials that do not scatter (pure emitters), which ends the
    /// path there.
    ///
    /// * `isect` - The intersection on the surface.
    /// * `wo`    - Direction toward the viewer.
    /// * `u`     - Uniform random value for stochastic material blends.
    pub fn bsdf(&self, isect: &Intersection, wo: &Vector3f, u: Float) -> Option<Bsdf> {
        let n = isect.shading.normal;
        let t = isect.shading.tangent;

        match self {
            Material::Diffuse { reflectance } => {
                let r = reflectance.evaluate(&isect.uv);
                Some(Bsdf::new(n, t, BxDF::Diffuse(DiffuseBxDF::new(r))))
            }

            Material::Mirror { reflectance } => {
                let r = reflectance.evaluate(&isect.uv);
                Some(Bsdf::new(
                    n,
                    t,
                    BxDF::SpecularReflection(SpecularReflectionBxDF::new(r)),
                ))
            }

            Material::Dielectric { ior } => {
                // Normals are stored flipped against the ray, so the side
                // is encoded in front_face rather than in the cosine sign.
                let eta = if isect.front_face { *ior } else { 1.0 / *ior };
                Some(Bsdf::new(n, t, BxDF::Dielectric(DielectricBxDF::new(eta))))
            }

            Material::Metal { f0, roughness } => {
                let alpha = roughness_to_alpha(roughness.evaluate(&isect.uv));
                let mfd = TrowbridgeReitzDistribution::new(alpha, alpha);
                let f0 = f0.evaluate(&isect.uv);
                Some(Bsdf::new(n, t, BxDF::Conductor(ConductorBxDF::new(mfd, f0))))
            }

            Material::Principled { basecolor, metallic, roughness, .. } => {
                // Resolve a back-facing interpolated shading normal by
                // reflecting it about the geometric normal.
                let n = if n.dot(wo) < 0.0 { reflect(&n, &isect.normal) } else { n };

                let b = basecolor.evaluate(&isect.uv);
                let m = metallic.evaluate(&isect.uv);
                let alpha = roughness_to_alpha(roughness.evaluate(&isect.uv));

                // Split sampling effort between the halves by relative
                // Fresnel weight, clamped so neither half starves.
                let fr = fr_schlick(f0(b, m), n.dot(wo));
                let diffuse_weight = 1.0 - m;
                let specular_weight = fr.luminance();
                let blend = clamp(
                    specular_weight / max(diffuse_weight + specular_weight, 1e-4),
                    0.15,
                    0.9,
                );

                Some(Bsdf::new(
                    n,
                    t,
                    BxDF::Principled(PrincipledBxDF::new(b, m, alpha, blend)),
                ))
            }

            Material::DiffuseLight { .. } => None,

            Material::Mix { a, b, amount } => {
                let amt = clamp(amount.evaluate(&isect.uv), 0.0, 1.0);
                if u < amt {
                    let u = if amt > 0.0 { u / amt } else { 0.0 };
                    b.bsdf(isect, wo, u)
                } else {
                    let u = if amt < 1.0 { (u - amt) / (1.0 - amt) } else { 0.0 };
                    a.bsdf(isect, wo, u)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn isect_facing(front: bool) -> Intersection {
        let mut isect = Intersection::default();
        let d = if front { -Vector3f::Z_AXIS } else { Vector3f::Z_AXIS };
        isect.set_face_normal(&d, Vector3f::Z_AXIS, Vector3f::Z_AXIS, Vector3f::X_AXIS);
        isect
    }

    #[test]
    fn diffuse_light_has_no_bsdf() {
        let m = Material::DiffuseLight {
            emission: SpectrumTexture::Constant(Spectrum::new(5.0)),
            two_sided: false,
        };
        let isect = isect_facing(true);
        assert!(m.bsdf(&isect, &Vector3f::Z_AXIS, 0.5).is_none());
        assert!(m.is_emissive());
        assert_eq!(m.le(&isect, &Vector3f::Z_AXIS), Spectrum::new(5.0));
    }

    #[test]
    fn one_sided_light_is_dark_from_behind() {
        let m = Material::DiffuseLight {
            emission: SpectrumTexture::Constant(Spectrum::new(5.0)),
            two_sided: false,
        };
        let back = isect_facing(false);
        assert!(m.le(&back, &-Vector3f::Z_AXIS).is_black());

        let m2 = Material::DiffuseLight {
            emission: SpectrumTexture::Constant(Spectrum::new(5.0)),
            two_sided: true,
        };
        assert_eq!(m2.le(&back, &-Vector3f::Z_AXIS), Spectrum::new(5.0));
    }

    #[test]
    fn dielectric_eta_follows_face_orientation() {
        let m = Material::Dielectric { ior: 1.5 };
        let front = isect_facing(true);
        let back = isect_facing(false);
        // Both sides produce a BSDF; orientation only changes the relative
        // index handed to the lobe, which the sample's eta exposes.
        let b_front = m.bsdf(&front, &Vector3f::Z_AXIS, 0.0).unwrap();
        let b_back = m.bsdf(&back, &-Vector3f::Z_AXIS, 0.0).unwrap();
        let s_front = b_front
            .sample_f(&Vector3f::Z_AXIS, 0.999, &Point2f::new(0.0, 0.0))
            .unwrap();
        let s_back = b_back
            .sample_f(&-Vector3f::Z_AXIS, 0.999, &Point2f::new(0.0, 0.0))
            .unwrap();
        assert!((s_front.eta - 1.5).abs() < 1e-6);
        assert!((s_back.eta - 1.0 / 1.5).abs() < 1e-6);
    }

    #[test]
    fn mix_material_selects_both_sides() {
        let a = Arc::new(Material::Diffuse {
            reflectance: SpectrumTexture::Constant(Spectrum::new(0.5)),
        });
        let b = Arc::new(Material::Mirror {
            reflectance: SpectrumTexture::Constant(Spectrum::ONE),
        });
        let m = Material::Mix {
            a: Arc::clone(&a),
            b: Arc::clone(&b),
            amount: FloatTexture::Constant(0.5),
        };
        let isect = isect_facing(true);
        let wo = Vector3f::Z_AXIS;
        let low = m.bsdf(&isect, &wo, 0.1).unwrap();
        let high = m.bsdf(&isect, &wo, 0.9).unwrap();
        // u below the blend amount picks b (the mirror).
        assert!(low.flags().is_specular());
        assert!(!high.flags().is_specular());
    }
}
