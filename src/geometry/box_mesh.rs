//! Subdivided box meshes used as deformation input.

use super::face::BoxFace;
use crate::mesh::IndexedMesh;

/// An axis-aligned box centred on the origin, each face split into a
/// `segments x segments` grid of quads.
///
/// Faces do not share vertices, so edge vertices appear once per face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxMesh {
    /// Edge length of the box.
    pub size: f32,
    /// Grid subdivisions per face edge (>= 1).
    pub segments: u32,
}

impl Default for BoxMesh {
    fn default() -> Self {
        Self {
            size: 15.0,
            segments: 64,
        }
    }
}

impl BoxMesh {
    /// Creates a box description; `segments` is raised to at least 1.
    pub fn new(size: f32, segments: u32) -> Self {
        Self {
            size,
            segments: segments.max(1),
        }
    }

    pub fn vertex_count(&self) -> usize {
        let side = self.segments as usize + 1;
        6 * side * side
    }

    pub fn triangle_count(&self) -> usize {
        let n = self.segments as usize;
        6 * 2 * n * n
    }

    /// Builds the mesh with outward-facing counter-clockwise triangles.
    pub fn build(&self) -> IndexedMesh {
        let n = self.segments;
        let side = n + 1;
        let half = self.size * 0.5;

        let mut positions = Vec::with_capacity(self.vertex_count());
        let mut indices = Vec::with_capacity(self.triangle_count() * 3);

        for face in BoxFace::all() {
            let base = positions.len() as u32;

            for j in 0..side {
                let t = (j as f32 / n as f32) * 2.0 - 1.0;
                for i in 0..side {
                    let s = (i as f32 / n as f32) * 2.0 - 1.0;
                    positions.push(face.cube_point(s, t) * half);
                }
            }

            for j in 0..n {
                for i in 0..n {
                    let a = base + j * side + i;
                    let b = a + 1;
                    let c = a + side + 1;
                    let d = a + side;
                    indices.extend_from_slice(&[a, b, c, a, c, d]);
                }
            }
        }

        IndexedMesh::from_checked_parts(positions, indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::VertexBuffer;

    #[test]
    fn test_counts_match_built_mesh() {
        let shape = BoxMesh::new(2.0, 5);
        let mesh = shape.build();
        assert_eq!(mesh.vertex_count(), shape.vertex_count());
        assert_eq!(mesh.triangle_count(), shape.triangle_count());
        assert_eq!(shape.vertex_count(), 6 * 36);
    }

    #[test]
    fn test_vertices_on_box_surface() {
        let mesh = BoxMesh::new(15.0, 3).build();
        for p in mesh.positions() {
            let max_axis = p.abs().max_element();
            assert!((max_axis - 7.5).abs() < 1e-5, "vertex {:?} off the surface", p);
        }
    }

    #[test]
    fn test_normals_point_outward() {
        let mesh = BoxMesh::new(4.0, 2).build();
        for (p, n) in mesh.positions().iter().zip(mesh.normals()) {
            assert!(p.dot(*n) > 0.0, "normal {:?} at {:?} faces inward", n, p);
        }
    }

    #[test]
    fn test_zero_segments_raised_to_one() {
        let shape = BoxMesh::new(1.0, 0);
        assert_eq!(shape.segments, 1);
        assert_eq!(shape.build().triangle_count(), 12);
    }
}
