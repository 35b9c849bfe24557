//! Error types for segwal
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using WalError
pub type Result<T> = std::result::Result<T, WalError>;

/// Unified error type for write-ahead log operations
#[derive(Debug, Error)]
pub enum WalError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Read Errors
    // -------------------------------------------------------------------------
    #[error("record not found")]
    RecordNotFound,

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("max index size must be a non-zero multiple of 16")]
    MaxIndexSize,

    // -------------------------------------------------------------------------
    // Space Exhaustion
    //
    // Internal rollover signals. They only reach the caller when a single
    // record cannot fit an empty segment.
    // -------------------------------------------------------------------------
    #[error("no store space left")]
    NoStoreSpaceLeft,

    #[error("no index space left")]
    NoIndexSpaceLeft,

    // -------------------------------------------------------------------------
    // On-Disk State Errors
    // -------------------------------------------------------------------------
    #[error("corrupted log state: {0}")]
    Corruption(String),
}
