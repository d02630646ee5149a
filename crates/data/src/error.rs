//! Error types for the data layer.

use thiserror::Error;

/// Local key-value storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem error.
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Writing would exceed the configured byte quota.
    #[error("storage quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded { needed: usize, quota: usize },

    /// Key contains characters that cannot be stored.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// Remote document store errors.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The store cannot be reached.
    #[error("remote store unavailable")]
    Unavailable,

    /// A live subscription was dropped by the store.
    #[error("remote subscription disconnected")]
    Disconnected,

    /// Backend-specific failure (query, connection, listener).
    #[error("remote backend error: {0}")]
    Backend(String),
}

#[cfg(feature = "postgres")]
impl From<sqlx::Error> for RemoteError {
    fn from(e: sqlx::Error) -> Self {
        Self::Backend(e.to_string())
    }
}

#[cfg(feature = "postgres")]
impl From<sqlx::migrate::MigrateError> for RemoteError {
    fn from(e: sqlx::migrate::MigrateError) -> Self {
        Self::Backend(e.to_string())
    }
}

/// Errors from explicit sync operations (seeding).
///
/// Mutations never return this: their remote failures are only logged.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("failed to encode document: {0}")]
    Encode(#[from] serde_json::Error),
}
