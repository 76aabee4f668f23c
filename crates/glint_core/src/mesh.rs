//! Mesh geometry representation.
//!
//! A flat vertex + index buffer with optional texture coordinates, as
//! produced by the model loaders and consumed by the renderer's mesh shape.

use glint_math::{Aabb, DVec2, DVec3};

/// One triangle's corners and texture coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriangleVertices {
    pub positions: [DVec3; 3],
    pub uvs: [DVec2; 3],
}

/// A mesh consisting of vertex positions, optional UVs, and triangle indices.
#[derive(Clone, Debug)]
pub struct Mesh {
    /// Vertex positions (one DVec3 per vertex)
    pub positions: Vec<DVec3>,

    /// UV coordinates (optional - one per vertex)
    pub uvs: Option<Vec<DVec2>>,

    /// Triangle indices (every 3 indices form a triangle)
    pub indices: Vec<u32>,

    /// Axis-aligned bounding box
    pub bounds: Aabb,

    /// Material registry index (optional)
    pub material: Option<usize>,
}

impl Mesh {
    /// Create a new mesh from positions and indices.
    pub fn new(positions: Vec<DVec3>, indices: Vec<u32>) -> Self {
        let bounds = Aabb::from_iter_points(positions.iter().copied());
        Self {
            positions,
            uvs: None,
            indices,
            bounds,
            material: None,
        }
    }

    /// Attach per-vertex texture coordinates.
    pub fn with_uvs(mut self, uvs: Vec<DVec2>) -> Self {
        self.uvs = Some(uvs);
        self
    }

    /// Attach a material registry index.
    pub fn with_material(mut self, material: usize) -> Self {
        self.material = Some(material);
        self
    }

    /// Check if the mesh has UV coordinates.
    pub fn has_uvs(&self) -> bool {
        self.uvs.is_some()
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// First index that points past the vertex buffer, if any.
    pub fn first_invalid_index(&self) -> Option<u32> {
        let count = self.positions.len();
        self.indices
            .iter()
            .copied()
            .find(|&i| i as usize >= count)
    }

    /// Extract every complete, in-range triangle.
    ///
    /// Missing UVs come back as zero. Out-of-range triangles are skipped
    /// with a warning.
    pub fn triangles(&self) -> Vec<TriangleVertices> {
        let mut triangles = Vec::with_capacity(self.triangle_count());
        let count = self.positions.len();

        for chunk in self.indices.chunks_exact(3) {
            let idx = [chunk[0] as usize, chunk[1] as usize, chunk[2] as usize];

            if idx.iter().any(|&i| i >= count) {
                log::warn!(
                    "Invalid triangle indices: {:?}, vertex count: {}",
                    idx,
                    count
                );
                continue;
            }

            let uv = |i: usize| {
                self.uvs
                    .as_ref()
                    .and_then(|uvs| uvs.get(i).copied())
                    .unwrap_or(DVec2::ZERO)
            };

            triangles.push(TriangleVertices {
                positions: idx.map(|i| self.positions[i]),
                uvs: idx.map(uv),
            });
        }

        triangles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> Mesh {
        let positions = vec![
            DVec3::new(0.0, 0.0, 0.0), // v0
            DVec3::new(1.0, 0.0, 0.0), // v1
            DVec3::new(0.0, 1.0, 0.0), // v2
            DVec3::new(1.0, 1.0, 0.0), // v3
        ];
        // Two triangles: [0,1,2] and [1,3,2]
        Mesh::new(positions, vec![0, 1, 2, 1, 3, 2])
    }

    #[test]
    fn test_mesh_creation() {
        let mesh = quad();

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert!(!mesh.has_uvs());
        assert_eq!(mesh.material, None);
    }

    #[test]
    fn test_bounds_computation() {
        let positions = vec![
            DVec3::new(-1.0, -2.0, -3.0),
            DVec3::new(4.0, 5.0, 6.0),
            DVec3::new(0.0, 0.0, 0.0),
        ];
        let mesh = Mesh::new(positions, vec![0, 1, 2]);

        assert!((mesh.bounds.x.min - (-1.0)).abs() < 0.001);
        assert!((mesh.bounds.x.max - 4.0).abs() < 0.001);
        assert!((mesh.bounds.y.min - (-2.0)).abs() < 0.001);
        assert!((mesh.bounds.y.max - 5.0).abs() < 0.001);
        assert!((mesh.bounds.z.min - (-3.0)).abs() < 0.001);
        assert!((mesh.bounds.z.max - 6.0).abs() < 0.001);
    }

    #[test]
    fn test_extract_triangles() {
        let uvs = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(0.0, 1.0),
            DVec2::new(1.0, 1.0),
        ];
        let mesh = quad().with_uvs(uvs);
        let triangles = mesh.triangles();

        assert_eq!(triangles.len(), 2, "Should extract 2 triangles");
        assert_eq!(triangles[1].positions[0], mesh.positions[1]);
        assert_eq!(triangles[1].positions[1], mesh.positions[3]);
        assert_eq!(triangles[1].positions[2], mesh.positions[2]);
        assert_eq!(triangles[1].uvs[1], DVec2::new(1.0, 1.0));
    }

    #[test]
    fn test_invalid_indices_skipped() {
        let mut mesh = quad();
        mesh.indices.extend_from_slice(&[0, 1, 9]);

        assert_eq!(mesh.first_invalid_index(), Some(9));
        assert_eq!(mesh.triangles().len(), 2);
    }
}
