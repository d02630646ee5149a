//! Integration tests for synchronization sessions sharing one document store.

use std::collections::HashSet;

use dulsan_core::{NewCategory, ProductUpdate, ReservationStatus, defaults};
use dulsan_data::{
    CacheKey, Collection, DocPath, Freshness, MemoryRemote, RemoteStore, SeedOutcome, Singleton,
    Storage,
};
use dulsan_integration_tests::{Harness, new_product, new_reservation};
use serde_json::json;

// =============================================================================
// Products
// =============================================================================

#[tokio::test]
async fn test_added_products_get_unique_ids() {
    let harness = Harness::new();
    let before = harness.data.products().len();

    let added: Vec<_> = (0..20)
        .map(|i| {
            harness
                .data
                .add_product(new_product(&format!("Concha {i}"), "Pan dulce"))
        })
        .collect();

    let ids: HashSet<_> = added.iter().map(|p| p.id.clone()).collect();
    assert_eq!(ids.len(), added.len());

    let products = harness.data.products();
    assert_eq!(products.len(), before + added.len());
    assert_eq!(products.last(), added.last());

    let cached = harness
        .storage
        .get_item(CacheKey::Products.as_str())
        .expect("read")
        .expect("cached");
    assert!(cached.contains("Concha 19"));
}

#[tokio::test]
async fn test_product_write_reaches_other_session() {
    let remote = MemoryRemote::new();
    let admin = Harness::on(remote.clone());
    let visitor = Harness::on(remote.clone());
    admin.data.connect().await;
    visitor.data.connect().await;

    let product = admin
        .data
        .add_product(new_product("Brownie de nuez", "Chocolate amargo"));
    admin.data.flush().await;
    visitor
        .wait_until(|s| s.products.value.iter().any(|p| p.id == product.id))
        .await;

    admin.data.update_product(
        &product.id,
        ProductUpdate {
            available: Some(false),
            ..ProductUpdate::default()
        },
    );
    admin.data.flush().await;
    visitor
        .wait_until(|s| {
            s.products
                .value
                .iter()
                .any(|p| p.id == product.id && !p.available)
        })
        .await;
    assert_eq!(visitor.data.state().products.freshness, Freshness::Live);
}

// =============================================================================
// Reservations
// =============================================================================

#[tokio::test]
async fn test_delete_reservation_is_immediate_even_offline() {
    let harness = Harness::new();
    let reservation = harness.data.add_reservation(new_reservation("Ana"));
    harness.remote.set_offline(true);

    assert!(harness.data.delete_reservation(&reservation.id));
    assert!(harness.data.reservations().is_empty());
    let cached = harness
        .storage
        .get_item(CacheKey::Reservations.as_str())
        .expect("read");
    assert_eq!(cached.as_deref(), Some("[]"));

    harness.data.flush().await;
    assert!(harness.data.reservations().is_empty());
}

#[tokio::test]
async fn test_confirmation_reaches_other_session() {
    let remote = MemoryRemote::new();
    let visitor = Harness::on(remote.clone());
    let admin = Harness::on(remote.clone());
    visitor.data.connect().await;
    admin.data.connect().await;

    let reservation = visitor.data.add_reservation(new_reservation("Marta"));
    visitor.data.flush().await;
    admin
        .wait_until(|s| s.reservations.value.iter().any(|r| r.id == reservation.id))
        .await;

    admin.data.confirm_reservation(&reservation.id);
    admin.data.flush().await;
    visitor
        .wait_until(|s| {
            s.reservations
                .value
                .iter()
                .any(|r| r.id == reservation.id && r.status == ReservationStatus::Confirmed)
        })
        .await;
}

// =============================================================================
// Empty snapshots
// =============================================================================

#[tokio::test]
async fn test_emptied_collections() {
    let remote = MemoryRemote::new();
    let harness = Harness::on(remote.clone());
    harness.data.add_reservation(new_reservation("Ana"));
    harness.data.flush().await;

    // Populated store with a single product, so nothing is seeded and the
    // first snapshot replaces the defaults.
    remote
        .set_document(
            &Singleton::Business.path(),
            serde_json::to_value(defaults::business_config()).expect("encode"),
        )
        .await
        .expect("set");
    let path = DocPath::new(Collection::MenuItems, "1");
    remote
        .set_document(
            &path,
            json!({"name": "Concha", "price": 18, "category": "pan"}),
        )
        .await
        .expect("set");

    harness.data.connect().await;
    harness
        .wait_until(|s| s.products.value.len() == 1 && !s.reservations.value.is_empty())
        .await;

    remote.delete_document(&path).await.expect("delete");
    for reservation in remote.collection(Collection::Reservations) {
        remote
            .delete_document(&DocPath::new(Collection::Reservations, reservation.id))
            .await
            .expect("delete");
    }

    harness.wait_until(|s| s.reservations.value.is_empty()).await;
    // The empty product snapshot was ignored.
    assert_eq!(harness.data.products().len(), 1);
}

// =============================================================================
// Seeding
// =============================================================================

#[tokio::test]
async fn test_first_session_seeds_shared_store() {
    let remote = MemoryRemote::new();
    let first = Harness::on(remote.clone());
    let second = Harness::on(remote.clone());

    assert_eq!(
        first.data.seed_if_empty().await.expect("seed"),
        SeedOutcome::Seeded {
            documents: Singleton::ALL.len()
                + defaults::categories().len()
                + defaults::products().len()
        }
    );
    assert_eq!(
        second.data.seed_if_empty().await.expect("seed"),
        SeedOutcome::AlreadyPopulated
    );
    assert_eq!(
        remote.collection(Collection::MenuItems).len(),
        defaults::products().len()
    );
    assert!(remote.document(&Singleton::Business.path()).is_some());
}

// =============================================================================
// Categories
// =============================================================================

#[tokio::test]
async fn test_category_names_collide_on_id() {
    let harness = Harness::new();
    let first = harness.data.add_category(NewCategory {
        name: "Tés Especiales".to_string(),
        icon: "🍵".to_string(),
    });
    let second = harness.data.add_category(NewCategory {
        name: "tés especiales".to_string(),
        icon: "🫖".to_string(),
    });

    assert_eq!(first.id, second.id);
    let matching: Vec<_> = harness
        .data
        .categories()
        .into_iter()
        .filter(|c| c.id == first.id)
        .collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching.first().map(|c| c.name.as_str()), Some("tés especiales"));

    harness.data.flush().await;
    let stored = harness
        .remote
        .document(&DocPath::new(Collection::Categories, first.id.as_str()))
        .expect("written through");
    assert_eq!(stored["icon"], "🫖");
}

// =============================================================================
// Reset
// =============================================================================

#[tokio::test]
async fn test_reset_is_overwritten_by_next_snapshot() {
    let remote = MemoryRemote::new();
    let harness = Harness::on(remote.clone());
    harness.data.connect().await;
    harness
        .wait_until(|s| s.config.freshness == Freshness::Live)
        .await;

    let mut config = harness.data.config();
    config.name = "Dulsan Centro".to_string();
    harness.data.save_config(config.clone());
    harness.data.flush().await;

    harness.data.reset();
    assert_eq!(harness.data.config(), defaults::business_config());
    assert_eq!(
        remote
            .document(&Singleton::Business.path())
            .and_then(|d| d["name"].as_str().map(str::to_owned)),
        Some("Dulsan Centro".to_string())
    );

    // The next remote change to the document replaces the reset value.
    config.name = "Dulsan Norte".to_string();
    remote
        .set_document(
            &Singleton::Business.path(),
            serde_json::to_value(&config).expect("encode"),
        )
        .await
        .expect("set");
    harness.wait_until(|s| s.config.value.name == "Dulsan Norte").await;
}
