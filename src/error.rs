//! Error types for session persistence.
//!
//! Storage hosts report [`StorageError`]; the session store wraps those and
//! serialization failures into [`SessionError`].

/// Error type for key-value storage hosts.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// IO error from a file-backed host.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// The storage facility cannot be reached (no home directory, access denied, ...).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The host refused the write because it would exceed its capacity.
    #[error("quota exceeded: {needed} bytes requested, {limit} allowed")]
    QuotaExceeded {
        /// Size of the rejected value.
        needed: usize,
        /// Host capacity.
        limit: usize,
    },
}

impl StorageError {
    /// Create an unavailable error.
    #[inline]
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Error type for session store operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The storage host failed.
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    /// The record could not be serialized, or the stored text is not a valid record.
    #[error("json: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for session store operations.
pub type SessionResult<T> = std::result::Result<T, SessionError>;
