//! Error types for the suite runner

use thiserror::Error;

/// Errors raised while configuring or running a harness suite
#[derive(Debug, Error)]
pub enum BuildError {
    /// Invalid or inconsistent suite configuration
    #[error("configuration error: {0}")]
    Config(String),
    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Metrics or report (de)serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Malformed configuration file
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
    /// The worker pool could not be started
    #[error("worker pool error: {0}")]
    Pool(String),
    /// Foundation-level failure
    #[error("{0}")]
    Foundation(#[from] uproof_error::Error),
}

/// Result type for suite operations
pub type BuildResult<T> = Result<T, BuildError>;
