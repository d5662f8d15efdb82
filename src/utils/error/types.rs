//! Error types for the platform core

use thiserror::Error;

/// Result type alias for the platform core
pub type Result<T> = std::result::Result<T, PlatformError>;

/// Process-level error type.
///
/// Request-time authentication and authorization outcomes are
/// [`AuthError`](crate::auth::AuthError) values; this type covers startup,
/// configuration and the external collaborators the core talks to.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Crypto errors
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// Errors reported by an external store (permissions, ownership, users)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}
