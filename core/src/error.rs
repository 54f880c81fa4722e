//! Error types for introspection and orchestration.
//!
//! Every variant is fatal for a documentation run. Per-command rendering
//! problems are reported separately by the render crate and never abort a
//! run.

use thiserror::Error;

/// Errors that stop a documentation run.
#[derive(Debug, Error)]
pub enum DocError {
    /// The parser handle lacks the minimum required shape.
    #[error("introspection failed: {0}")]
    Introspection(String),

    /// Required metadata is missing or malformed.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Convenience alias for results with [`DocError`].
pub type Result<T> = std::result::Result<T, DocError>;
