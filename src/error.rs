//! Error types shared by every module of the crate.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, NetworkError>;

#[derive(Error, Debug)]
pub enum NetworkError {
    /// A network needs at least an input and an output layer.
    #[error("too few layers: a network needs at least 2, got {found}")]
    TooFewLayers { found: usize },

    #[error("expected one activation per layer ({layers}), got {activations}")]
    ActivationCountMismatch { layers: usize, activations: usize },

    #[error("layer {index} has no units")]
    EmptyLayer { index: usize },

    /// A layer's outgoing weights do not line up with the next layer's width.
    #[error("layer {index} has {declared} outgoing connections but the next layer has {actual} units")]
    LayerMismatch { index: usize, declared: usize, actual: usize },

    /// Input vector shorter than the input layer.
    #[error("input too short: input layer has {expected} units, got {found} values")]
    InputTooShort { expected: usize, found: usize },

    /// Expected-output vector does not match the output layer.
    #[error("length mismatch: expected {expected} values, got {found}")]
    LengthMismatch { expected: usize, found: usize },

    #[error("unknown activation tag '{0}'")]
    UnknownActivation(String),

    #[error("unknown cost tag '{0}'")]
    UnknownCost(String),

    /// Malformed saved network; `line` is 1-based.
    #[error("malformed network file at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}
