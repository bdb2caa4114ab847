//! Error types for annolink-core.

use thiserror::Error;

/// Result type for annolink-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for annolink-core operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A feature name that the schema does not define.
    #[error("Unknown feature '{name}' for schema '{schema}'")]
    UnknownFeature {
        /// Offending feature name
        name: String,
        /// Schema the lookup was made against
        schema: String,
    },
}

impl Error {
    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a parse error.
    #[must_use]
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create an unknown feature error.
    #[must_use]
    pub fn unknown_feature(name: impl Into<String>, schema: impl Into<String>) -> Self {
        Self::UnknownFeature {
            name: name.into(),
            schema: schema.into(),
        }
    }
}
