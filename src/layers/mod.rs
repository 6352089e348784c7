//! Ordered collections of noise layers.
//!
//! A [`LayerSet`] is plain data owned by the host. The deformer reads it for
//! one pass and never keeps a reference to it.

mod config;

pub use config::LayerSetFile;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{DeformError, ParamLocation};
use crate::noise::{evaluate, NoiseLayerParams, NoiseSource};

/// An ordered list of noise layers whose contributions are summed.
///
/// Order only matters for presentation: the summed scale is the same for any
/// permutation of the layers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerSet {
    layers: Vec<NoiseLayerParams>,
}

impl LayerSet {
    /// Creates an empty layer set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a layer set holding a single layer.
    pub fn single(params: NoiseLayerParams) -> Self {
        Self {
            layers: vec![params],
        }
    }

    /// Appends a layer.
    pub fn push(&mut self, params: NoiseLayerParams) -> &mut Self {
        self.layers.push(params);
        self
    }

    /// Appends a layer with default parameters and returns its index.
    pub fn create_layer(&mut self) -> usize {
        self.layers.push(NoiseLayerParams::default());
        self.layers.len() - 1
    }

    /// Replaces the layer at `index`, returning the previous parameters.
    ///
    /// Returns `None` and leaves the set unchanged if `index` is out of range.
    pub fn replace(&mut self, index: usize, params: NoiseLayerParams) -> Option<NoiseLayerParams> {
        self.layers
            .get_mut(index)
            .map(|slot| std::mem::replace(slot, params))
    }

    /// Removes and returns the layer at `index`, if any.
    pub fn remove(&mut self, index: usize) -> Option<NoiseLayerParams> {
        (index < self.layers.len()).then(|| self.layers.remove(index))
    }

    pub fn get(&self, index: usize) -> Option<&NoiseLayerParams> {
        self.layers.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut NoiseLayerParams> {
        self.layers.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NoiseLayerParams> {
        self.layers.iter()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Total octave count across all layers.
    pub fn total_octaves(&self) -> u64 {
        self.layers.iter().map(|l| l.num_octaves as u64).sum()
    }

    /// Validates every layer, reporting the first offending index.
    pub fn validate(&self) -> Result<(), DeformError> {
        for (index, layer) in self.layers.iter().enumerate() {
            layer.validate_at(ParamLocation::Layer(index))?;
        }
        Ok(())
    }

    /// Sum of every layer's [`evaluate`] result at `point`.
    ///
    /// An empty set yields 0, leaving the surface at the base radius.
    pub fn scale_at<N>(&self, noise: &N, point: Vec3) -> f32
    where
        N: NoiseSource + ?Sized,
    {
        self.layers
            .iter()
            .map(|layer| evaluate(noise, point, layer))
            .sum()
    }
}

impl From<Vec<NoiseLayerParams>> for LayerSet {
    fn from(layers: Vec<NoiseLayerParams>) -> Self {
        Self { layers }
    }
}

impl FromIterator<NoiseLayerParams> for LayerSet {
    fn from_iter<I: IntoIterator<Item = NoiseLayerParams>>(iter: I) -> Self {
        Self {
            layers: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a LayerSet {
    type Item = &'a NoiseLayerParams;
    type IntoIter = std::slice::Iter<'a, NoiseLayerParams>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers.iter()
    }
}
