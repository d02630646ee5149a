//! Integration tests for the versioned local cache.

use dulsan_core::{
    AboutConfig, BusinessConfig, Category, ImagesConfig, Product, Reservation, SocialConfig,
    defaults,
};
use dulsan_data::{
    CacheKey, DATA_VERSION, LocalCache, LocalData, MemoryRemote, MemoryStorage, Storage,
    VERSION_KEY,
};
use dulsan_integration_tests::{Harness, new_reservation};
use serde::Serialize;
use serde::de::DeserializeOwned;

fn roundtrip<T>(cache: &LocalCache<MemoryStorage>, key: CacheKey, value: &T)
where
    T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
{
    cache.persist(key, value);
    let loaded: Option<T> = cache.restore(key);
    assert_eq!(loaded.as_ref(), Some(value), "{key} did not round-trip");
}

// =============================================================================
// Round trips
// =============================================================================

#[tokio::test]
async fn test_every_entity_roundtrips() {
    let harness = Harness::new();
    let reservation = harness.data.add_reservation(new_reservation("Ana"));
    let cache = LocalCache::new(MemoryStorage::new());

    roundtrip::<Vec<Product>>(&cache, CacheKey::Products, &defaults::products());
    roundtrip::<Vec<Category>>(&cache, CacheKey::Categories, &defaults::categories());
    roundtrip::<BusinessConfig>(&cache, CacheKey::Config, &defaults::business_config());
    roundtrip::<ImagesConfig>(&cache, CacheKey::Images, &defaults::images_config());
    roundtrip::<AboutConfig>(&cache, CacheKey::About, &defaults::about_config());
    roundtrip::<SocialConfig>(&cache, CacheKey::Social, &defaults::social_config());
    roundtrip::<Vec<Reservation>>(&cache, CacheKey::Reservations, &vec![reservation]);
}

#[tokio::test]
async fn test_new_session_restores_previous_state() {
    let storage = MemoryStorage::new();
    let first = Harness::with(MemoryRemote::new(), storage.clone());
    let mut about = first.data.about();
    about.title = "Desde 2015".to_string();
    first.data.save_about(about.clone());
    let reservation = first.data.add_reservation(new_reservation("Luis"));

    // Offline restart: same cache, no store reachable.
    let second = Harness::with(MemoryRemote::new(), storage);
    assert_eq!(second.data.about(), about);
    assert_eq!(second.data.reservations(), vec![reservation]);
}

// =============================================================================
// Version marker
// =============================================================================

#[tokio::test]
async fn test_version_mismatch_purges_everything() {
    let storage = MemoryStorage::new();
    storage.set_item(VERSION_KEY, "4.0").expect("set");
    for key in CacheKey::ALL {
        storage.set_item(key.as_str(), "[]").expect("set");
    }

    let cache = LocalCache::new(storage.clone());
    for key in CacheKey::ALL {
        let fallback = vec![1, 2, 3];
        assert_eq!(cache.load(key, fallback.clone()), fallback);
    }

    assert_eq!(cache.version().as_deref(), Some(DATA_VERSION));
    for key in CacheKey::ALL {
        assert_eq!(storage.get_item(key.as_str()).expect("get"), None);
    }
}

#[tokio::test]
async fn test_stale_cache_falls_back_to_defaults() {
    let storage = MemoryStorage::new();
    storage.set_item(VERSION_KEY, "1.0").expect("set");
    storage
        .set_item(CacheKey::Products.as_str(), "[]")
        .expect("set");

    let data = LocalData::new(MemoryRemote::new(), storage);
    assert_eq!(data.products(), defaults::products());
}

#[tokio::test]
async fn test_full_storage_keeps_memory_state() {
    // Too small for the product list; writes are dropped silently.
    let storage = MemoryStorage::with_quota(256);
    let harness = Harness::with(MemoryRemote::new(), storage.clone());

    let reservation = harness.data.add_reservation(new_reservation("Eva"));
    assert_eq!(harness.data.reservations(), vec![reservation]);
}
