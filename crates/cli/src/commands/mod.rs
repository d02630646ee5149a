//! Command implementations.

pub mod cache;
pub mod migrate;
pub mod seed;

use secrecy::SecretString;
use thiserror::Error;

/// Errors shared by the commands that talk to the document store.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Document store error.
    #[error("Document store error: {0}")]
    Remote(#[from] dulsan_data::RemoteError),

    /// Seeding stopped part way.
    #[error("Seed failed: {0}")]
    Sync(#[from] dulsan_data::SyncError),

    /// Local cache error.
    #[error("Cache error: {0}")]
    Storage(#[from] dulsan_data::StorageError),
}

/// Database URL from `DULSAN_DATABASE_URL`, falling back to `DATABASE_URL`.
pub fn database_url() -> Result<SecretString, CommandError> {
    std::env::var("DULSAN_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| CommandError::MissingEnvVar("DULSAN_DATABASE_URL"))
}
