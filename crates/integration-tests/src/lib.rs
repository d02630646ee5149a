//! Integration tests for the Dulsan menu.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p dulsan-integration-tests
//! ```
//!
//! Everything runs in-process: the document store is a [`MemoryRemote`] and
//! the local cache a [`MemoryStorage`], so no database is needed.
//!
//! # Test Categories
//!
//! - `cache` - Versioned local cache
//! - `sync` - Synchronization sessions sharing one document store
//! - `catalog` - Menu filtering, search and the admin password gate
//! - `http_api` - The storefront router end to end

use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use dulsan_core::{CategoryId, ImageRef, NewProduct, NewReservation, Price};
use dulsan_data::{Local, LocalData, MemoryRemote, MemoryStorage, Remote, State};
use dulsan_storefront::config::StorefrontConfig;
use dulsan_storefront::middleware::ADMIN_PASSWORD_HEADER;
use dulsan_storefront::state::{AppState, MenuData};
use serde_json::Value;
use tower::ServiceExt;

/// Default admin password from the seed data.
pub const ADMIN_PASSWORD: &str = "admin123";

/// A session on an in-memory store, with handles on both backends.
pub struct Harness {
    pub data: MenuData,
    pub remote: MemoryRemote,
    pub storage: MemoryStorage,
}

impl Harness {
    /// Fresh store, fresh cache.
    #[must_use]
    pub fn new() -> Self {
        Self::on(MemoryRemote::new())
    }

    /// Fresh cache on a shared store.
    #[must_use]
    pub fn on(remote: MemoryRemote) -> Self {
        Self::with(remote, MemoryStorage::new())
    }

    /// Given store and cache.
    #[must_use]
    pub fn with(remote: MemoryRemote, storage: MemoryStorage) -> Self {
        let data = LocalData::new(
            Remote::from(remote.clone()),
            Local::from(storage.clone()),
        );
        Self {
            data,
            remote,
            storage,
        }
    }

    /// The storefront router over this session, rate limiting off.
    ///
    /// # Panics
    ///
    /// Panics if the default configuration fails to load.
    #[must_use]
    pub fn router(&self) -> Router {
        self.router_with(|config| config.rate_limit = false)
    }

    /// The storefront router with rate limiting on, keyed by the
    /// `x-forwarded-for` header as behind the production proxy.
    ///
    /// # Panics
    ///
    /// Panics if the default configuration fails to load.
    #[must_use]
    pub fn rate_limited_router(&self) -> Router {
        self.router_with(|config| {
            config.rate_limit = true;
            config.trust_proxy_headers = true;
        })
    }

    fn router_with(&self, configure: impl FnOnce(&mut StorefrontConfig)) -> Router {
        let mut config = StorefrontConfig::from_vars(|_| None).expect("default config");
        configure(&mut config);
        dulsan_storefront::app(AppState::new(config, self.data.clone()))
    }

    /// Wait until `done` holds for the session state.
    ///
    /// # Panics
    ///
    /// Panics if the condition is not reached within two seconds.
    pub async fn wait_until(&self, done: impl Fn(&State) -> bool) {
        wait_until(&self.data, done).await;
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait until `done` holds for the session state.
///
/// # Panics
///
/// Panics if the condition is not reached within two seconds.
pub async fn wait_until(data: &MenuData, done: impl Fn(&State) -> bool) {
    let mut changes = data.changes();
    tokio::time::timeout(Duration::from_secs(2), async {
        while !data.read(&done) {
            if changes.changed().await.is_err() {
                return;
            }
        }
    })
    .await
    .expect("condition not reached in time");
}

/// A product in the `otros` category.
#[must_use]
pub fn new_product(name: &str, description: &str) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        price: Price::whole(55),
        description: description.to_string(),
        image: ImageRef::default(),
        category: CategoryId::new("otros"),
        available: true,
    }
}

/// A single-file `multipart/form-data` body; returns its content type and
/// bytes.
#[must_use]
pub fn multipart_file(content_type: &str, bytes: &[u8]) -> (String, Vec<u8>) {
    const BOUNDARY: &str = "dulsan-upload-boundary";

    let mut body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"upload\"\r\n\
         Content-Type: {content_type}\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}

/// A valid reservation request.
#[must_use]
pub fn new_reservation(name: &str) -> NewReservation {
    NewReservation {
        name: name.to_string(),
        phone: "555 123 4567".to_string(),
        date: "2026-10-24".to_string(),
        time: "18:30".to_string(),
        people: 4,
        notes: String::new(),
    }
}

/// Send one request through `router` and decode the JSON body.
///
/// Returns `Value::Null` for empty or non-JSON bodies.
///
/// # Panics
///
/// Panics if the request cannot be built or the body cannot be read.
pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    password: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(password) = password {
        builder = builder.header(ADMIN_PASSWORD_HEADER, password);
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request");

    send_request(router, request).await
}

/// Send a prepared request through `router` and decode the JSON body.
///
/// Returns `Value::Null` for empty or non-JSON bodies.
///
/// # Panics
///
/// Panics if the body cannot be read.
pub async fn send_request(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}
