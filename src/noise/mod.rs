//! Noise evaluation for surface displacement.
//!
//! A seeded continuous 3D noise primitive ([`NoiseSource`]) is layered into
//! octave stacks described by [`NoiseLayerParams`].

mod fractal;
mod source;

pub use fractal::{evaluate, NoiseLayerParams};
pub use source::{NoiseBackend, NoiseSource, SeededNoise};
