//! Error types for sync-registry

use std::path::PathBuf;

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in registry operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to acquire the registry lock
    #[error("Failed to lock registry at {path}")]
    LockFailed { path: PathBuf },

    /// The registry file exists but cannot be parsed
    #[error("Invalid registry file {path}: {source}")]
    InvalidFile {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
