//! Radial displacement of mesh vertices on a sphere.
//!
//! Every pass starts from the unit-sphere direction of each vertex, so
//! repeated passes never compound earlier displacement.

use glam::Vec3;
use rayon::prelude::*;

use crate::error::DeformError;
use crate::layers::LayerSet;
use crate::mesh::VertexBuffer;
use crate::noise::NoiseSource;

/// Execution options for deformation passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeformOptions {
    /// Split the vertex loop across the rayon thread pool.
    pub parallel: bool,
    /// Meshes with fewer vertices than this run sequentially.
    pub parallel_threshold: usize,
}

impl Default for DeformOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            parallel_threshold: 4096,
        }
    }
}

impl DeformOptions {
    /// Options that never leave the calling thread.
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Default::default()
        }
    }
}

/// Displaces mesh vertices along their directions from the origin using a
/// summed stack of noise layers.
///
/// The deformer holds only its noise source and options. Meshes and layer
/// sets are borrowed for the duration of one call.
#[derive(Debug, Clone)]
pub struct SphereDeformer<N> {
    noise: N,
    options: DeformOptions,
}

impl<N: NoiseSource> SphereDeformer<N> {
    pub fn new(noise: N) -> Self {
        Self::with_options(noise, DeformOptions::default())
    }

    pub fn with_options(noise: N, options: DeformOptions) -> Self {
        Self { noise, options }
    }

    pub fn noise(&self) -> &N {
        &self.noise
    }

    pub fn options(&self) -> DeformOptions {
        self.options
    }

    /// Moves every vertex onto the unit sphere.
    ///
    /// Fails with [`DeformError::InvalidVertex`] if any vertex has no
    /// direction, leaving the mesh untouched.
    pub fn normalize_to_unit_sphere<M>(&self, mesh: &mut M) -> Result<(), DeformError>
    where
        M: VertexBuffer + ?Sized,
    {
        let parallel = self.runs_parallel(mesh.vertex_count());
        normalize_vertices(mesh, parallel)
    }

    /// Displaces every vertex to `dir * base_radius * (1 + scale)`, where `dir`
    /// is the vertex's unit direction and `scale` the summed layer value there.
    ///
    /// The mesh does not need to be on the unit sphere beforehand.
    ///
    /// # Arguments
    /// * `mesh` - Vertex buffer rewritten in place
    /// * `base_radius` - Sphere radius before displacement (finite, > 0)
    /// * `layers` - Noise layers summed at each direction
    ///
    /// # Returns
    /// `Ok(())` once every vertex is written and the normals sink notified.
    /// On any error the mesh keeps its pre-call positions and the sink is not
    /// notified: `InvalidParameter` for a bad radius or layer,
    /// `InvalidVertex` for a vertex at the origin or non-finite, and
    /// `NumericOverflow` when a displaced position is not finite.
    pub fn deform<M>(&self, mesh: &mut M, base_radius: f32, layers: &LayerSet) -> Result<(), DeformError>
    where
        M: VertexBuffer + ?Sized,
    {
        if !(base_radius.is_finite() && base_radius > 0.0) {
            return Err(DeformError::argument(format!(
                "base_radius must be finite and > 0, got {}",
                base_radius
            )));
        }
        layers.validate()?;

        let vertex_count = mesh.vertex_count();
        let _span = tracing::debug_span!(
            "deform",
            vertices = vertex_count,
            layers = layers.len(),
            octaves = layers.total_octaves(),
            base_radius
        )
        .entered();

        let parallel = self.runs_parallel(vertex_count);
        let displaced = map_vertices(mesh.positions(), parallel, |index, position| {
            let direction = unit_direction(index, position)?;
            let displaced = self.displace(direction, base_radius, layers);
            if displaced.is_finite() {
                Ok(displaced)
            } else {
                Err(DeformError::NumericOverflow { index })
            }
        })?;

        write_back(mesh, &displaced);
        tracing::debug!(parallel, "deform pass complete");
        Ok(())
    }

    /// Displaced position for a single unit `direction`.
    ///
    /// This is the per-vertex formula of [`SphereDeformer::deform`] without
    /// validation, useful for sampling the surface away from mesh vertices.
    pub fn displace(&self, direction: Vec3, base_radius: f32, layers: &LayerSet) -> Vec3 {
        let scale = layers.scale_at(&self.noise, direction);
        direction * base_radius * (1.0 + scale)
    }

    fn runs_parallel(&self, vertex_count: usize) -> bool {
        self.options.parallel && vertex_count >= self.options.parallel_threshold
    }
}

/// Moves every vertex of `mesh` onto the unit sphere without a deformer,
/// e.g. to reset a mesh before applying a fresh layer set.
///
/// Fails with [`DeformError::InvalidVertex`] if any vertex has no direction,
/// leaving the mesh untouched.
pub fn normalize_to_unit_sphere<M>(mesh: &mut M) -> Result<(), DeformError>
where
    M: VertexBuffer + ?Sized,
{
    normalize_vertices(mesh, false)
}

fn normalize_vertices<M>(mesh: &mut M, parallel: bool) -> Result<(), DeformError>
where
    M: VertexBuffer + ?Sized,
{
    let units = map_vertices(mesh.positions(), parallel, unit_direction)?;
    write_back(mesh, &units);
    Ok(())
}

/// Returns the (min, max) distance from the origin over `positions`.
///
/// An empty slice yields `(f32::MAX, f32::MIN)`.
pub fn radius_range(positions: &[Vec3]) -> (f32, f32) {
    positions.iter().fold((f32::MAX, f32::MIN), |(min, max), p| {
        let r = p.length();
        (min.min(r), max.max(r))
    })
}

fn unit_direction(index: usize, position: Vec3) -> Result<Vec3, DeformError> {
    let length = position.length();
    if length.is_finite() && length > 0.0 {
        Ok(position / length)
    } else {
        Err(DeformError::InvalidVertex { index })
    }
}

/// Maps every vertex into scratch storage so that a failure anywhere leaves
/// the source untouched.
fn map_vertices<F>(positions: &[Vec3], parallel: bool, f: F) -> Result<Vec<Vec3>, DeformError>
where
    F: Fn(usize, Vec3) -> Result<Vec3, DeformError> + Send + Sync,
{
    if parallel {
        positions
            .par_iter()
            .enumerate()
            .map(|(index, &position)| f(index, position))
            .collect()
    } else {
        positions
            .iter()
            .enumerate()
            .map(|(index, &position)| f(index, position))
            .collect()
    }
}

fn write_back<M: VertexBuffer + ?Sized>(mesh: &mut M, positions: &[Vec3]) {
    mesh.positions_mut().copy_from_slice(positions);
    mesh.normals_changed();
}
