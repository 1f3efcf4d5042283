//! Error types for the eventual client.

use thiserror::Error;

/// Errors that can occur across the eventual client.
#[derive(Error, Debug)]
pub enum EventualError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Auth(String),

    /// The backend rejected our token. `redirect` is false when the current
    /// route is in the public allow-list.
    #[error("Sesión expirada")]
    SessionExpired { redirect: bool },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Permission denied: {0}")]
    Permission(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for eventual operations.
pub type EventualResult<T> = Result<T, EventualError>;
