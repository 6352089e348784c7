//! Seeded continuous 3D noise primitives.

use std::fmt;

use glam::Vec3;
use noise::{NoiseFn, OpenSimplex, Perlin};
use serde::{Deserialize, Serialize};
use simdnoise::NoiseBuilder;

/// A deterministic, continuous scalar field over 3D space.
///
/// Implementations must return values in `[-1, 1]` and must return the same
/// value for the same input every time. Any `Fn(Vec3) -> f32` closure is a
/// noise source, which keeps stubs in tests cheap.
pub trait NoiseSource: Send + Sync {
    /// Samples the field at `point`.
    fn sample(&self, point: Vec3) -> f32;

    /// Largest coordinate magnitude the field can be sampled at.
    ///
    /// Callers must not pass points with any component beyond this bound.
    fn max_coordinate(&self) -> f32 {
        f32::MAX
    }
}

impl<F> NoiseSource for F
where
    F: Fn(Vec3) -> f32 + Send + Sync,
{
    fn sample(&self, point: Vec3) -> f32 {
        self(point)
    }
}

/// Which noise algorithm backs a [`SeededNoise`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoiseBackend {
    /// OpenSimplex gradient noise.
    #[default]
    Simplex,
    /// Classic Perlin gradient noise.
    Perlin,
    /// SIMD-accelerated simplex noise, sampled one point at a time.
    Simd,
}

impl NoiseBackend {
    /// Returns the lowercase name of the backend.
    pub fn name(self) -> &'static str {
        match self {
            NoiseBackend::Simplex => "simplex",
            NoiseBackend::Perlin => "perlin",
            NoiseBackend::Simd => "simd",
        }
    }
}

/// Lattice cells are indexed with 32-bit integers by every backend.
const MAX_LATTICE_COORDINATE: f32 = 1.0e9;

/// simdnoise leaves 3D simplex unscaled, in roughly `[-1/32, 1/32]`.
const SIMD_SIMPLEX_3D_SCALE: f32 = 32.0;

enum Generator {
    Simplex(OpenSimplex),
    Perlin(Perlin),
    Simd,
}

/// A noise field fixed by a backend and a seed.
///
/// The same backend and seed always produce the same field, so meshes
/// deformed with it are reproducible.
pub struct SeededNoise {
    backend: NoiseBackend,
    seed: u32,
    generator: Generator,
}

impl SeededNoise {
    /// Creates a noise field for the given backend and seed.
    pub fn new(backend: NoiseBackend, seed: u32) -> Self {
        let generator = match backend {
            NoiseBackend::Simplex => Generator::Simplex(OpenSimplex::new(seed)),
            NoiseBackend::Perlin => Generator::Perlin(Perlin::new(seed)),
            NoiseBackend::Simd => Generator::Simd,
        };
        Self {
            backend,
            seed,
            generator,
        }
    }

    /// Creates an OpenSimplex field with the given seed.
    pub fn simplex(seed: u32) -> Self {
        Self::new(NoiseBackend::Simplex, seed)
    }

    pub fn backend(&self) -> NoiseBackend {
        self.backend
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }
}

impl fmt::Debug for SeededNoise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeededNoise")
            .field("backend", &self.backend)
            .field("seed", &self.seed)
            .finish()
    }
}

impl NoiseSource for SeededNoise {
    fn sample(&self, point: Vec3) -> f32 {
        let value = match &self.generator {
            Generator::Simplex(noise) => noise.get(to_f64(point)) as f32,
            Generator::Perlin(noise) => noise.get(to_f64(point)) as f32,
            Generator::Simd => {
                // A single-octave 1x1x1 grid placed at the point
                let raw = NoiseBuilder::fbm_3d_offset(point.x, 1, point.y, 1, point.z, 1)
                    .with_seed(self.seed as i32)
                    .with_freq(1.0)
                    .with_octaves(1)
                    .generate()
                    .0[0];
                raw * SIMD_SIMPLEX_3D_SCALE
            }
        };
        value.clamp(-1.0, 1.0)
    }

    fn max_coordinate(&self) -> f32 {
        MAX_LATTICE_COORDINATE
    }
}

#[inline]
fn to_f64(point: Vec3) -> [f64; 3] {
    [point.x as f64, point.y as f64, point.z as f64]
}
