//! # Error Types
//!
//! This module defines error types used throughout the escpos-relay library.
//! HTTP-facing errors live in `server::error` and wrap these.

use thiserror::Error;

/// Main error type for relay operations
#[derive(Debug, Error)]
pub enum RelayError {
    /// Malformed configuration (registry file, printer spec, settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Printer unreachable, connection refused or reset
    #[error("Connection error: {0}")]
    Connection(String),

    /// Connect or write did not finish within the configured timeout
    #[error("Timed out: {0}")]
    Timeout(String),

    /// Invalid command or parameter
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// Image decoding or processing error
    #[error("Image error: {0}")]
    Image(String),

    /// HTTP listener could not bind or stopped unexpectedly
    #[error("Server error: {0}")]
    Server(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used by the library modules
pub type RelayResult<T> = Result<T, RelayError>;
