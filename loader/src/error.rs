//! Error types for loading catalogues, struct descriptors, and configuration.
//!
//! Every failure here is fatal for a run: nothing is validated from a
//! partially loaded input.

use thiserror::Error;

/// Errors that can occur while loading check inputs.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Invalid or missing input (non-existent path, wrong extension, ...).
    #[error("{0}")]
    InvalidInput(String),
}

/// Convenience alias for results with [`LoadError`].
pub type Result<T> = std::result::Result<T, LoadError>;
