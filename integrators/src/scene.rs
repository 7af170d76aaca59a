//! Scene assembly.

use accelerators::Bvh;
use core::base::*;
use core::geometry::*;
use core::interaction::Intersection;
use lights::{AreaLight, Light, UniformLightSampler};
use shapes::{Mesh, Primitive};
use std::collections::HashMap;
use std::sync::Arc;

/// An immutable scene: the primitive list, the light list and the spatial
/// index over the primitives. Built once, single-threaded, then shared
/// read-only across render workers.
pub struct Scene {
    primitives: Vec<Arc<Primitive>>,
    lights: Vec<Light>,
    infinite_lights: Vec<u32>,
    area_lights: HashMap<u32, u32>,
    light_sampler: UniformLightSampler,
    bvh: Bvh<u32>,
}

impl Scene {
    /// Nearest-hit query against the spatial index. The returned record
    /// carries the dense index of the hit primitive.
    ///
    /// * `ray`   - The ray.
    /// * `t_min` - Minimum parametric distance.
    /// * `t_max` - Maximum parametric distance.
    pub fn intersect(&self, ray: &Ray, t_min: Float, t_max: Float) -> Option<Intersection> {
        let mut closest: Option<Intersection> = None;
        self.bvh.ray_cast(ray, t_min, t_max, |r, inner_t_min, t, index| {
            let primitive = &self.primitives[index as usize];
            if let Some(mut isect) = primitive.intersect(r, inner_t_min, t) {
                isect.primitive = index;
                let hit_t = isect.t;
                closest = Some(isect);
                // Tighten the traversal interval to the new closest hit.
                return hit_t;
            }
            t
        });
        closest
    }

    /// Occlusion query: returns true if anything blocks the ray inside the
    /// interval. Short-circuits on the first hit.
    ///
    /// * `ray`   - The ray.
    /// * `t_min` - Minimum parametric distance.
    /// * `t_max` - Maximum parametric distance.
    pub fn intersect_any(&self, ray: &Ray, t_min: Float, t_max: Float) -> bool {
        let mut hit = false;
        self.bvh.ray_cast(ray, t_min, t_max, |r, inner_t_min, t, index| {
            if self.primitives[index as usize].intersect_any(r, inner_t_min, t) {
                hit = true;
                // The t_min sentinel stops the traversal immediately.
                return inner_t_min;
            }
            t
        });
        hit
    }

    /// Returns the primitive at a dense index.
    ///
    /// * `index` - Dense primitive index from an `Intersection`.
    pub fn primitive(&self, index: u32) -> &Arc<Primitive> {
        &self.primitives[index as usize]
    }

    /// Number of primitives in the scene.
    pub fn primitive_count(&self) -> usize {
        self.primitives.len()
    }

    /// All lights in the scene.
    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Returns the light at a dense index.
    ///
    /// * `index` - Dense light index.
    pub fn light(&self, index: u32) -> &Light {
        &self.lights[index as usize]
    }

    /// Iterates the infinite lights together with their dense indices.
    pub fn infinite_lights(&self) -> impl Iterator<Item = (u32, &Light)> {
        self.infinite_lights
            .iter()
            .map(move |&i| (i, &self.lights[i as usize]))
    }

    /// Returns the dense index of the area light bound to a primitive, if
    /// the primitive is emissive.
    ///
    /// * `primitive_index` - Dense primitive index.
    pub fn area_light_index(&self, primitive_index: u32) -> Option<u32> {
        self.area_lights.get(&primitive_index).copied()
    }

    /// The light selection strategy used for next-event estimation.
    pub fn light_sampler(&self) -> &UniformLightSampler {
        &self.light_sampler
    }
}

/// Accumulates primitives and lights, then builds the spatial index. An
/// emissive primitive automatically registers an area light bound to it.
#[derive(Default)]
pub struct SceneBuilder {
    primitives: Vec<Arc<Primitive>>,
    lights: Vec<Light>,
}

impl SceneBuilder {
    /// Create an empty `SceneBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a primitive and returns its dense index. Emissive primitives
    /// are also registered as area lights.
    ///
    /// * `primitive` - The primitive.
    pub fn add_primitive(&mut self, primitive: Primitive) -> u32 {
        let index = self.primitives.len() as u32;
        let primitive = Arc::new(primitive);
        if primitive.material().is_emissive() {
            self.lights
                .push(Light::Area(AreaLight::new(Arc::clone(&primitive), index)));
        }
        self.primitives.push(primitive);
        index
    }

    /// Adds every triangle of a mesh as a primitive.
    ///
    /// * `mesh` - The mesh.
    pub fn add_mesh(&mut self, mesh: Arc<Mesh>) {
        for i in 0..mesh.triangle_count() {
            self.add_primitive(Primitive::Triangle(shapes::Triangle::new(
                Arc::clone(&mesh),
                i as u32,
            )));
        }
    }

    /// Adds a non-area light (point, directional or infinite).
    ///
    /// * `light` - The light.
    pub fn add_light(&mut self, light: Light) {
        debug_assert!(
            !matches!(light, Light::Area(_)),
            "area lights are registered through their emissive primitive"
        );
        self.lights.push(light);
    }

    /// Builds the spatial index and freezes the scene. Insertion builds
    /// the tree incrementally; a final rebuild reconditions the topology,
    /// which is the normal path for static scenes.
    pub fn build(self) -> Scene {
        let mut bvh = Bvh::new();
        for (i, primitive) in self.primitives.iter().enumerate() {
            bvh.create_proxy(primitive.aabb(), i as u32);
        }
        if !bvh.is_empty() {
            bvh.rebuild();
        }

        let infinite_lights = self
            .lights
            .iter()
            .enumerate()
            .filter(|(_, l)| l.is_infinite_light())
            .map(|(i, _)| i as u32)
            .collect();

        let area_lights = self
            .lights
            .iter()
            .enumerate()
            .filter_map(|(i, l)| match l {
                Light::Area(area) => Some((area.primitive_index, i as u32)),
                _ => None,
            })
            .collect();

        info!(
            "scene built: {} primitives, {} lights",
            self.primitives.len(),
            self.lights.len()
        );

        Scene {
            light_sampler: UniformLightSampler::new(self.lights.len()),
            primitives: self.primitives,
            lights: self.lights,
            infinite_lights,
            area_lights,
            bvh,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::material::Material;
    use core::spectrum::Spectrum;
    use core::texture::SpectrumTexture;
    use shapes::Sphere;

    fn diffuse() -> Arc<Material> {
        Arc::new(Material::Diffuse {
            reflectance: SpectrumTexture::Constant(Spectrum::new(0.5)),
        })
    }

    fn emissive() -> Arc<Material> {
        Arc::new(Material::DiffuseLight {
            emission: SpectrumTexture::Constant(Spectrum::new(3.0)),
            two_sided: false,
        })
    }

    #[test]
    fn emissive_primitive_registers_an_area_light() {
        let mut builder = SceneBuilder::new();
        builder.add_primitive(Primitive::Sphere(Sphere::new(Point3f::ZERO, 1.0, diffuse())));
        let emissive_index = builder.add_primitive(Primitive::Sphere(Sphere::new(
            Point3f::new(0.0, 5.0, 0.0),
            1.0,
            emissive(),
        )));
        let scene = builder.build();

        assert_eq!(scene.lights().len(), 1);
        assert!(scene.area_light_index(emissive_index).is_some());
        assert!(scene.area_light_index(0).is_none());
    }

    #[test]
    fn intersections_carry_primitive_indices() {
        let mut builder = SceneBuilder::new();
        builder.add_primitive(Primitive::Sphere(Sphere::new(
            Point3f::new(0.0, 0.0, -5.0),
            1.0,
            diffuse(),
        )));
        builder.add_primitive(Primitive::Sphere(Sphere::new(
            Point3f::new(0.0, 0.0, -10.0),
            1.0,
            diffuse(),
        )));
        let scene = builder.build();

        let ray = Ray::new(Point3f::ZERO, -Vector3f::Z_AXIS);
        let isect = scene.intersect(&ray, Ray::EPSILON, INFINITY).unwrap();
        assert_eq!(isect.primitive, 0);
        assert!((isect.t - 4.0).abs() < 1e-3);

        // The occlusion query sees the same geometry.
        assert!(scene.intersect_any(&ray, Ray::EPSILON, INFINITY));
        assert!(!scene.intersect_any(&ray, Ray::EPSILON, 3.0));
    }

    #[test]
    fn empty_scene_misses_everything() {
        let scene = SceneBuilder::new().build();
        let ray = Ray::new(Point3f::ZERO, Vector3f::X_AXIS);
        assert!(scene.intersect(&ray, Ray::EPSILON, INFINITY).is_none());
        assert!(!scene.intersect_any(&ray, Ray::EPSILON, INFINITY));
    }
}
