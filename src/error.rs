//! Error types for annolink.

use thiserror::Error;

/// Result type for annolink operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for annolink operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Group data length differs from the number of examples in the group.
    #[error("Shape mismatch: group has {examples} examples but {data} data items")]
    ShapeMismatch {
        /// Number of examples in the rejected group
        examples: usize,
        /// Number of group data items supplied
        data: usize,
    },

    /// A feature pack's dimension differs from the gatherer's.
    #[error("Dimension mismatch: expected {expected} features, got {actual}")]
    DimensionMismatch {
        /// Dimension fixed for the gatherer
        expected: usize,
        /// Dimension of the offending feature pack
        actual: usize,
    },

    /// An operation needs the feature dimension but no example was ever added.
    #[error("Unknown feature dimension: no example has been gathered yet")]
    UnknownFeatureDimension,

    /// A 1-based feature index outside `1..=dimension`.
    #[error("Invalid feature index {index}: features are numbered 1..={dimension}")]
    InvalidFeatureIndex {
        /// Offending index
        index: usize,
        /// Feature dimension
        dimension: usize,
    },

    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// External trainer failed or could not be started.
    #[error("Trainer failed: {0}")]
    Trainer(String),

    /// Model file could not be loaded or used.
    #[error("Model error: {0}")]
    Model(String),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// Error from the core types.
    #[error(transparent)]
    Core(#[from] annolink_core::Error),
}

impl Error {
    /// Create an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Error::Parse(msg.into())
    }

    /// Create a trainer error.
    pub fn trainer(msg: impl Into<String>) -> Self {
        Error::Trainer(msg.into())
    }

    /// Create a model error.
    pub fn model(msg: impl Into<String>) -> Self {
        Error::Model(msg.into())
    }

    /// Create a config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }
}
