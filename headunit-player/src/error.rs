//! Error types for headunit-player
//!
//! Defines service-specific error types using thiserror for clear error
//! propagation. Source failures are never returned to control callers;
//! they surface as `Error` events on the callback channel.

use thiserror::Error;

/// Main error type for the headunit-player service
#[derive(Error, Debug)]
pub enum Error {
    /// Failure to open or probe the requested media source
    #[error("Source error: {0}")]
    Source(String),

    /// Engine resource errors (descriptor duplication, invalid handle)
    #[error("Engine error: {0}")]
    Engine(String),

    /// HTTP server errors
    #[error("HTTP server error: {0}")]
    Http(String),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Other errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience Result type using the headunit-player Error
pub type Result<T> = std::result::Result<T, Error>;
