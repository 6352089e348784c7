//! Mutable vertex buffers that the deformer rewrites in place.
//!
//! The deformer only needs positions and a way to report that they changed.
//! [`IndexedMesh`] is a ready-made triangle mesh that recomputes its vertex
//! normals when told.

use glam::Vec3;

use crate::error::MeshError;

/// A vertex position buffer owned by the host.
///
/// The vertex count never changes through this trait; only positions are
/// rewritten.
pub trait VertexBuffer {
    /// All vertex positions.
    fn positions(&self) -> &[Vec3];

    /// All vertex positions, mutably.
    fn positions_mut(&mut self) -> &mut [Vec3];

    /// Called once after a pass rewrote the positions. Derived data such as
    /// normals is stale from this point on.
    fn normals_changed(&mut self);

    fn vertex_count(&self) -> usize {
        self.positions().len()
    }

    fn position(&self, index: usize) -> Option<Vec3> {
        self.positions().get(index).copied()
    }
}

/// A bare position list has no normals to refresh.
impl VertexBuffer for Vec<Vec3> {
    fn positions(&self) -> &[Vec3] {
        self
    }

    fn positions_mut(&mut self) -> &mut [Vec3] {
        self
    }

    fn normals_changed(&mut self) {}
}

/// An indexed triangle mesh with per-vertex normals.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedMesh {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    indices: Vec<u32>,
}

impl IndexedMesh {
    /// Creates a mesh from positions and a triangle list, computing normals.
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Result<Self, MeshError> {
        if indices.len() % 3 != 0 {
            return Err(MeshError::PartialTriangle(indices.len()));
        }
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= positions.len()) {
            return Err(MeshError::IndexOutOfRange {
                index,
                vertex_count: positions.len(),
            });
        }

        Ok(Self::from_checked_parts(positions, indices))
    }

    /// Builds a mesh from buffers the caller has already checked.
    pub(crate) fn from_checked_parts(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        debug_assert!(indices.len() % 3 == 0);
        debug_assert!(indices.iter().all(|&i| (i as usize) < positions.len()));
        let mut mesh = Self {
            normals: vec![Vec3::ZERO; positions.len()],
            positions,
            indices,
        };
        mesh.recompute_normals();
        mesh
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterates triangles as vertex index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|t| [t[0] as usize, t[1] as usize, t[2] as usize])
    }

    /// Recomputes area-weighted vertex normals from the current positions.
    ///
    /// Vertices touched only by degenerate triangles get a zero normal.
    pub fn recompute_normals(&mut self) {
        let mut normals = vec![Vec3::ZERO; self.positions.len()];

        for [a, b, c] in self.triangles() {
            let pa = self.positions[a];
            let face_normal = (self.positions[b] - pa).cross(self.positions[c] - pa);
            normals[a] += face_normal;
            normals[b] += face_normal;
            normals[c] += face_normal;
        }

        for n in &mut normals {
            *n = n.normalize_or_zero();
        }
        self.normals = normals;
    }
}

impl VertexBuffer for IndexedMesh {
    fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    fn positions_mut(&mut self) -> &mut [Vec3] {
        &mut self.positions
    }

    fn normals_changed(&mut self) {
        self.recompute_normals();
    }
}
