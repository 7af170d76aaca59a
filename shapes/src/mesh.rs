//! Triangle meshes.

use core::base::*;
use core::geometry::*;
use core::material::Material;
use std::sync::Arc;

/// Shared, immutable vertex storage for a triangle mesh. Triangles borrow
/// from it through an `Arc` and own no geometry themselves.
pub struct Mesh {
    /// Vertex positions.
    pub positions: Vec<Point3f>,

    /// Per-vertex shading normals.
    pub normals: Vec<Vector3f>,

    /// Per-vertex shading tangents.
    pub tangents: Vec<Vector3f>,

    /// Per-vertex texture coordinates.
    pub tex_coords: Vec<Point2f>,

    /// Triangle vertex indices, three per triangle.
    pub indices: Vec<u32>,

    /// Material shared by every triangle of the mesh.
    pub material: Arc<Material>,
}

impl Mesh {
    /// Create a mesh from positions and indices alone. Shading normals are
    /// accumulated from area-weighted face normals; texture coordinates
    /// default to zero and tangents to an arbitrary orthogonal direction.
    ///
    /// * `positions` - Vertex positions.
    /// * `indices`   - Triangle vertex indices.
    /// * `material`  - Material for the whole mesh.
    pub fn new(positions: Vec<Point3f>, indices: Vec<u32>, material: Arc<Material>) -> Self {
        let mut normals = vec![Vector3f::ZERO; positions.len()];
        for tri in indices.chunks_exact(3) {
            let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let e1 = positions[i1] - positions[i0];
            let e2 = positions[i2] - positions[i0];
            // The cross product length weights by twice the face area.
            let n = e1.cross(&e2);
            normals[i0] += n;
            normals[i1] += n;
            normals[i2] += n;
        }
        for n in normals.iter_mut() {
            if n.length_squared() > 0.0 {
                *n = n.normalize();
            } else {
                warn!("mesh vertex with no incident non-degenerate face; defaulting normal");
                *n = Vector3f::Z_AXIS;
            }
        }

        let tex_coords = vec![Point2f::default(); positions.len()];
        Self::with_attributes(positions, normals, tex_coords, indices, material)
    }

    /// Create a mesh with full vertex attributes. Tangents are derived per
    /// vertex as an arbitrary direction orthogonal to the normal; meshes
    /// with authored tangent frames can overwrite the field afterwards.
    ///
    /// * `positions`  - Vertex positions.
    /// * `normals`    - Per-vertex shading normals.
    /// * `tex_coords` - Per-vertex texture coordinates.
    /// * `indices`    - Triangle vertex indices.
    /// * `material`   - Material for the whole mesh.
    pub fn with_attributes(
        positions: Vec<Point3f>,
        normals: Vec<Vector3f>,
        tex_coords: Vec<Point2f>,
        indices: Vec<u32>,
        material: Arc<Material>,
    ) -> Self {
        assert_eq!(positions.len(), normals.len());
        assert_eq!(positions.len(), tex_coords.len());
        assert_eq!(indices.len() % 3, 0);

        let tangents = normals
            .iter()
            .map(|n| {
                let (t, _) = coordinate_system(n);
                t
            })
            .collect();

        Self {
            positions,
            normals,
            tangents,
            tex_coords,
            indices,
            material,
        }
    }

    /// Returns the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::spectrum::Spectrum;
    use core::texture::SpectrumTexture;

    fn material() -> Arc<Material> {
        Arc::new(Material::Diffuse {
            reflectance: SpectrumTexture::Constant(Spectrum::new(0.5)),
        })
    }

    #[test]
    fn computed_normals_face_up_for_ccw_quad() {
        let mesh = Mesh::new(
            vec![
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, -1.0),
                Point3f::new(0.0, 0.0, -1.0),
            ],
            vec![0, 1, 2, 0, 2, 3],
            material(),
        );
        assert_eq!(mesh.triangle_count(), 2);
        for n in &mesh.normals {
            assert!((n.y - 1.0).abs() < 1e-5);
        }
        for (t, n) in mesh.tangents.iter().zip(&mesh.normals) {
            assert!(t.dot(n).abs() < 1e-5);
        }
    }
}
