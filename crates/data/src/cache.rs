//! Versioned JSON cache over a [`Storage`] backend.
//!
//! Every entity lives under its own key as a JSON snapshot. A single version
//! marker guards the whole cache: when it does not match [`DATA_VERSION`],
//! every entity key is purged and the marker rewritten, so a release with a
//! new seed dataset never mixes with stale cached data.
//!
//! Reads never fail (absent, corrupt or unreadable entries are a miss) and
//! writes never fail (quota or I/O errors are dropped).

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::storage::Storage;

/// Current cache layout version.
pub const DATA_VERSION: &str = "5.0";

/// Key holding the version marker.
pub const VERSION_KEY: &str = "dulsan_data_version";

/// Cached entity keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Products,
    Categories,
    Config,
    Images,
    Reservations,
    About,
    Social,
}

impl CacheKey {
    /// Every entity key.
    pub const ALL: [Self; 7] = [
        Self::Products,
        Self::Categories,
        Self::Config,
        Self::Images,
        Self::Reservations,
        Self::About,
        Self::Social,
    ];

    /// Storage key string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Products => "dulsan_products",
            Self::Categories => "dulsan_categories",
            Self::Config => "dulsan_config",
            Self::Images => "dulsan_images",
            Self::Reservations => "dulsan_reservations",
            Self::About => "dulsan_about",
            Self::Social => "dulsan_social",
        }
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The local cache.
#[derive(Debug, Clone)]
pub struct LocalCache<S> {
    storage: S,
}

impl<S: Storage> LocalCache<S> {
    #[must_use]
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    /// The underlying storage.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Read a cached value, distinguishing a hit from a miss.
    ///
    /// A version mismatch purges the cache first and always misses.
    pub fn restore<T: DeserializeOwned>(&self, key: CacheKey) -> Option<T> {
        if !self.check_version() {
            return None;
        }

        let raw = match self.storage.get_item(key.as_str()) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(%key, "cache miss");
                return None;
            }
            Err(e) => {
                debug!(%key, error = %e, "cache read failed");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!(%key, error = %e, "corrupt cache entry ignored");
                None
            }
        }
    }

    /// Read a cached value or fall back.
    pub fn load<T: DeserializeOwned>(&self, key: CacheKey, fallback: T) -> T {
        self.restore(key).unwrap_or(fallback)
    }

    /// Write a value. Failures are dropped.
    pub fn persist<T: Serialize + ?Sized>(&self, key: CacheKey, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                debug!(%key, error = %e, "cache encode failed");
                return;
            }
        };
        if let Err(e) = self.storage.set_item(key.as_str(), &raw) {
            debug!(%key, error = %e, "cache write dropped");
        }
    }

    /// Remove every entity key and the version marker.
    pub fn clear(&self) {
        self.purge();
        if let Err(e) = self.storage.remove_item(VERSION_KEY) {
            debug!(error = %e, "failed to remove cache version marker");
        }
    }

    /// Stored version marker, if any.
    #[must_use]
    pub fn version(&self) -> Option<String> {
        self.storage.get_item(VERSION_KEY).ok().flatten()
    }

    /// Returns `true` when the marker matches. On mismatch the cache is
    /// purged and the marker rewritten.
    fn check_version(&self) -> bool {
        match self.storage.get_item(VERSION_KEY) {
            Ok(Some(version)) if version == DATA_VERSION => true,
            Ok(found) => {
                info!(
                    found = found.as_deref().unwrap_or("none"),
                    current = DATA_VERSION,
                    "cache version changed, purging local cache"
                );
                self.purge();
                if let Err(e) = self.storage.set_item(VERSION_KEY, DATA_VERSION) {
                    debug!(error = %e, "failed to write cache version marker");
                }
                false
            }
            Err(e) => {
                debug!(error = %e, "cache version read failed");
                false
            }
        }
    }

    fn purge(&self) {
        for key in CacheKey::ALL {
            if let Err(e) = self.storage.remove_item(key.as_str()) {
                debug!(%key, error = %e, "failed to purge cache entry");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use dulsan_core::defaults;

    use super::*;
    use crate::storage::MemoryStorage;

    fn current_cache() -> LocalCache<MemoryStorage> {
        let storage = MemoryStorage::new();
        storage
            .set_item(VERSION_KEY, DATA_VERSION)
            .expect("set version");
        LocalCache::new(storage)
    }

    #[test]
    fn test_persist_then_load() {
        let cache = current_cache();
        let products = defaults::products();

        cache.persist(CacheKey::Products, &products);
        let loaded: Vec<dulsan_core::Product> = cache.load(CacheKey::Products, Vec::new());
        assert_eq!(loaded, products);
    }

    #[test]
    fn test_version_mismatch_purges_everything() {
        let storage = MemoryStorage::new();
        storage.set_item(VERSION_KEY, "4.0").expect("set");
        for key in CacheKey::ALL {
            storage.set_item(key.as_str(), "[]").expect("set");
        }

        let cache = LocalCache::new(storage.clone());
        let loaded: Vec<u32> = cache.load(CacheKey::Products, vec![7]);

        assert_eq!(loaded, vec![7]);
        assert_eq!(cache.version().as_deref(), Some(DATA_VERSION));
        assert_eq!(storage.keys(), vec![VERSION_KEY.to_string()]);

        // Later reads see the (empty) current-version cache.
        let social: Option<serde_json::Value> = cache.restore(CacheKey::Social);
        assert!(social.is_none());
    }

    #[test]
    fn test_missing_marker_counts_as_mismatch() {
        let storage = MemoryStorage::new();
        storage.set_item(CacheKey::About.as_str(), "{}").expect("set");

        let cache = LocalCache::new(storage);
        let about: Option<serde_json::Value> = cache.restore(CacheKey::About);
        assert!(about.is_none());
        assert_eq!(cache.version().as_deref(), Some(DATA_VERSION));
    }

    #[test]
    fn test_corrupt_entry_falls_back() {
        let cache = current_cache();
        cache
            .storage()
            .set_item(CacheKey::Config.as_str(), "{not json")
            .expect("set");

        let config = cache.load(CacheKey::Config, defaults::business_config());
        assert_eq!(config, defaults::business_config());
    }

    #[test]
    fn test_quota_exceeded_is_swallowed() {
        let storage = MemoryStorage::with_quota(64);
        storage.set_item(VERSION_KEY, DATA_VERSION).expect("set");
        let cache = LocalCache::new(storage);

        cache.persist(CacheKey::Products, &defaults::products());
        let products: Option<Vec<dulsan_core::Product>> = cache.restore(CacheKey::Products);
        assert!(products.is_none());
    }

    #[test]
    fn test_clear() {
        let cache = current_cache();
        cache.persist(CacheKey::Social, &defaults::social_config());
        cache.clear();
        assert!(cache.storage().keys().is_empty());
    }
}
