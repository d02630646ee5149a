//! Seed the document store with the default menu.
//!
//! Uses the same check as a starting server: nothing is written when the
//! business config document already exists.

use dulsan_data::{LocalData, MemoryStorage, PgRemote, SeedOutcome};

use super::{CommandError, database_url};

/// Seed an empty document store.
///
/// # Errors
///
/// Returns an error if the URL is missing, the connection fails or a write
/// fails. Documents written before the failure stay written.
pub async fn run() -> Result<(), CommandError> {
    let url = database_url()?;

    tracing::info!("Connecting to document store...");
    let remote = PgRemote::connect(&url).await?;

    // Scratch cache: seeding must not touch any server's local cache
    let data = LocalData::new(remote, MemoryStorage::new());

    match data.seed_if_empty().await? {
        SeedOutcome::Seeded { documents } => {
            tracing::info!(documents, "Document store seeded");
        }
        SeedOutcome::AlreadyPopulated | SeedOutcome::AlreadyAttempted => {
            tracing::info!("Document store already has data, nothing to do");
        }
    }
    Ok(())
}
