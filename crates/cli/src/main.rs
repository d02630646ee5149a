//! Dulsan CLI - document store and local cache tools.
//!
//! # Usage
//!
//! ```bash
//! # Create the document store schema
//! dulsan migrate
//!
//! # Write the default menu to an empty document store
//! dulsan seed
//!
//! # Inspect the local cache
//! dulsan cache show
//!
//! # Restore the default menu in the local cache
//! dulsan cache reset
//!
//! # Remove every cache entry
//! dulsan cache clear --dir /var/lib/dulsan/cache
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run document store migrations
//! - `seed` - Seed an empty document store with the default menu
//! - `cache show|reset|clear` - Local cache maintenance

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "dulsan")]
#[command(author, version, about = "Dulsan menu CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run document store migrations
    Migrate,
    /// Seed an empty document store with the default menu
    Seed,
    /// Inspect or reset the local cache
    Cache {
        /// Cache directory (defaults to `DULSAN_CACHE_DIR` or .dulsan-cache)
        #[arg(short, long, global = true)]
        dir: Option<PathBuf>,

        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Show the version marker and every cached entry
    Show,
    /// Replace cached data with the defaults (reservations are cleared)
    Reset,
    /// Remove every cached entry and the version marker
    Clear,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed => commands::seed::run().await?,
        Commands::Cache { dir, action } => {
            let dir = commands::cache::resolve_dir(dir);
            match action {
                CacheAction::Show => commands::cache::show(&dir)?,
                CacheAction::Reset => commands::cache::reset(&dir)?,
                CacheAction::Clear => commands::cache::clear(&dir)?,
            }
        }
    }
    Ok(())
}
