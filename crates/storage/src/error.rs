//! Storage error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when reading or writing a slot.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The write would exceed the store's capacity.
    #[error("storage quota exceeded: {needed} bytes needed, limit is {limit}")]
    QuotaExceeded {
        /// Configured capacity in bytes.
        limit: usize,
        /// Total bytes the store would hold after the write.
        needed: usize,
    },

    /// The key contains characters the backend cannot represent.
    #[error("invalid storage key {0:?}")]
    InvalidKey(String),

    /// Filesystem operation failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File or directory involved.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether retrying after freeing space could succeed.
    #[must_use]
    pub const fn is_quota(&self) -> bool {
        matches!(self, Self::QuotaExceeded { .. })
    }
}
