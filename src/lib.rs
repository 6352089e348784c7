//! Procedural planet surfaces from layered fractal noise.
//!
//! Mesh vertices are projected onto the unit sphere and pushed outward by
//! a summed stack of multi-octave noise layers, giving a bumpy planet whose
//! shape is controlled by a handful of per-layer parameters.

pub mod deform;
pub mod error;
pub mod export;
pub mod geometry;
pub mod layers;
pub mod mesh;
pub mod noise;

pub use deform::{normalize_to_unit_sphere, radius_range, DeformOptions, SphereDeformer};
pub use error::{ConfigError, DeformError, MeshError, ParamLocation};
pub use geometry::BoxMesh;
pub use layers::{LayerSet, LayerSetFile};
pub use mesh::{IndexedMesh, VertexBuffer};
pub use noise::{evaluate, NoiseBackend, NoiseLayerParams, NoiseSource, SeededNoise};
