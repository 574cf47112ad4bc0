//! Error types for the stowage engine.

use thiserror::Error;

/// Result type alias for stowage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while validating or solving a placement batch.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid item provided.
    #[error("Invalid item: {0}")]
    InvalidItem(String),

    /// Invalid container provided.
    #[error("Invalid container: {0}")]
    InvalidContainer(String),

    /// Invalid live placement provided.
    #[error("Invalid placement: {0}")]
    InvalidPlacement(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Internal error. Indicates a broken simulation invariant.
    #[error("Internal error: {0}")]
    Internal(String),
}
