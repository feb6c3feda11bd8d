//! Error types for TallyKV
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using KvError
pub type Result<T> = std::result::Result<T, KvError>;

/// Unified error type for TallyKV operations
#[derive(Debug, Error)]
pub enum KvError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    /// A log write, flush, sync or open could not complete.
    /// A `SET` that hits this is never acknowledged.
    #[error("IO failure: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Log Errors
    // -------------------------------------------------------------------------
    /// Only surfaced under `CorruptionPolicy::Fail`; otherwise replay skips the line.
    #[error("malformed record at line {line}: {reason}")]
    MalformedRecord { line: u64, reason: String },

    #[error("invalid token: {0}")]
    InvalidToken(String),

    // -------------------------------------------------------------------------
    // Lifecycle Errors
    // -------------------------------------------------------------------------
    #[error("engine has not been recovered yet")]
    NotRecovered,

    #[error("engine has already been recovered")]
    AlreadyRecovered,

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("configuration error: {0}")]
    Config(String),
}
