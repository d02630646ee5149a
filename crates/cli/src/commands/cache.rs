//! Local cache maintenance commands.
//!
//! # Usage
//!
//! ```bash
//! dulsan cache show
//! dulsan cache reset --dir .dulsan-cache
//! dulsan cache clear
//! ```
//!
//! Run these against a stopped server: a running one keeps its own in-memory
//! state and rewrites the cache on its next change.

use std::path::{Path, PathBuf};

use dulsan_data::{
    CacheKey, DATA_VERSION, FileStorage, LocalCache, LocalData, MemoryRemote, Storage,
};

use super::CommandError;

/// Default cache directory, shared with the storefront.
const DEFAULT_DIR: &str = ".dulsan-cache";

/// Explicit directory, else `DULSAN_CACHE_DIR`, else the default.
pub fn resolve_dir(dir: Option<PathBuf>) -> PathBuf {
    dir.or_else(|| std::env::var_os("DULSAN_CACHE_DIR").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DIR))
}

/// One line of `cache show`.
#[derive(Debug, PartialEq, Eq)]
pub struct EntrySummary {
    pub key: CacheKey,
    pub bytes: Option<usize>,
    /// Item count for list entries.
    pub items: Option<usize>,
}

/// Summarize every cache entry.
///
/// # Errors
///
/// Returns `StorageError` if an entry cannot be read.
pub fn summarize(storage: &impl Storage) -> Result<Vec<EntrySummary>, CommandError> {
    CacheKey::ALL
        .into_iter()
        .map(|key| {
            let raw = storage.get_item(key.as_str())?;
            let items = raw
                .as_deref()
                .and_then(|r| serde_json::from_str::<serde_json::Value>(r).ok())
                .and_then(|v| v.as_array().map(Vec::len));
            Ok(EntrySummary {
                key,
                bytes: raw.as_ref().map(String::len),
                items,
            })
        })
        .collect()
}

/// Print the version marker and a summary of every entry.
///
/// # Errors
///
/// Returns an error if the directory cannot be opened or read.
#[allow(clippy::print_stdout)]
pub fn show(dir: &Path) -> Result<(), CommandError> {
    let storage = FileStorage::open(dir)?;
    let cache = LocalCache::new(storage.clone());

    let version = cache.version();
    let status = match version.as_deref() {
        Some(DATA_VERSION) => "current",
        Some(_) => "stale, purged on next start",
        None => "missing",
    };
    println!("cache: {}", dir.display());
    println!(
        "version: {} ({status})",
        version.as_deref().unwrap_or("-")
    );

    for entry in summarize(&storage)? {
        match (entry.bytes, entry.items) {
            (None, _) => println!("  {:<22} -", entry.key),
            (Some(bytes), Some(items)) => {
                println!("  {:<22} {items} items, {bytes} bytes", entry.key);
            }
            (Some(bytes), None) => println!("  {:<22} {bytes} bytes", entry.key),
        }
    }
    Ok(())
}

/// Overwrite the cache with the defaults, exactly like the admin reset.
///
/// # Errors
///
/// Returns an error if the directory cannot be opened.
pub fn reset(dir: &Path) -> Result<(), CommandError> {
    let storage = FileStorage::open(dir)?;
    // Never connected, so nothing reaches any document store
    let data = LocalData::new(MemoryRemote::new(), storage);
    data.reset();
    tracing::info!(cache_dir = %dir.display(), "Local cache reset to defaults");
    Ok(())
}

/// Remove every entry and the version marker.
///
/// # Errors
///
/// Returns an error if the directory cannot be opened.
pub fn clear(dir: &Path) -> Result<(), CommandError> {
    let cache = LocalCache::new(FileStorage::open(dir)?);
    cache.clear();
    tracing::info!(cache_dir = %dir.display(), "Local cache cleared");
    Ok(())
}
