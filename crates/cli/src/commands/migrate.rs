//! Document store migration command.
//!
//! # Usage
//!
//! ```bash
//! dulsan migrate
//! ```
//!
//! # Environment Variables
//!
//! - `DULSAN_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`)
//!
//! # Migration Files
//!
//! Migrations live in `crates/data/migrations/` and are embedded in the
//! binary, so this command needs no source checkout.

use dulsan_data::PgRemote;

use super::{CommandError, database_url};

/// Run pending document store migrations.
///
/// # Errors
///
/// Returns an error if the URL is missing, the connection fails or a
/// migration fails.
pub async fn run() -> Result<(), CommandError> {
    let url = database_url()?;

    tracing::info!("Connecting to document store...");
    let remote = PgRemote::connect(&url).await?;

    tracing::info!("Running migrations...");
    remote.migrate().await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
