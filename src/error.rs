//! Error types for noise evaluation and mesh deformation.

use std::fmt;

use thiserror::Error;

/// Errors that can occur while normalizing or deforming a mesh.
///
/// Every variant is fatal for the call that produced it. The mesh is left in
/// its pre-call state and the normals sink is not notified.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeformError {
    #[error("Vertex {index} has a zero or non-finite length and no direction")]
    InvalidVertex { index: usize },
    #[error("Invalid parameter ({location}): {reason}")]
    InvalidParameter {
        location: ParamLocation,
        reason: String,
    },
    #[error("Vertex {index} produced a non-finite position")]
    NumericOverflow { index: usize },
}

impl DeformError {
    /// Creates an `InvalidParameter` error for a field of the layer at `index`.
    pub fn layer(index: usize, reason: impl Into<String>) -> Self {
        DeformError::InvalidParameter {
            location: ParamLocation::Layer(index),
            reason: reason.into(),
        }
    }

    /// Creates an `InvalidParameter` error for an argument of the deform call.
    pub fn argument(reason: impl Into<String>) -> Self {
        DeformError::InvalidParameter {
            location: ParamLocation::Argument,
            reason: reason.into(),
        }
    }
}

/// Where an invalid parameter was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamLocation {
    /// A layer of the layer set, by position.
    Layer(usize),
    /// A layer checked on its own, outside of any layer set.
    Standalone,
    /// A direct argument such as the base radius.
    Argument,
}

impl fmt::Display for ParamLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamLocation::Layer(index) => write!(f, "layer {}", index),
            ParamLocation::Standalone => write!(f, "layer"),
            ParamLocation::Argument => write!(f, "argument"),
        }
    }
}

/// Errors that can occur while assembling an indexed mesh.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    #[error("Index buffer length {0} is not a multiple of 3")]
    PartialTriangle(usize),
    #[error("Index {index} refers past the last of {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },
}

/// Errors that can occur while loading a layer set from disk.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed layer config: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] DeformError),
}
