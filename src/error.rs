//! Error types for strand
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using StrandError
pub type Result<T> = std::result::Result<T, StrandError>;

/// Unified error type for strand operations
#[derive(Debug, Error)]
pub enum StrandError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    /// A decode-time inconsistency in the command stream (bad tag,
    /// impossible length). Distinct from transport-level errors; never
    /// fatal to the connection.
    #[error("Framing error: {0}")]
    Frame(String),

    // -------------------------------------------------------------------------
    // Hardware Errors
    // -------------------------------------------------------------------------
    #[error("Render failed: {0}")]
    Render(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
