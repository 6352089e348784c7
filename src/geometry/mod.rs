//! Input geometry for deformation.
//!
//! Builds the subdivided box the deformer projects onto a sphere.

mod box_mesh;
mod face;

pub use box_mesh::BoxMesh;
pub use face::{BoxFace, FaceFrame};
