//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness (503 until live sync is running)
//! GET  /manifest.webmanifest   - Installability manifest
//!
//! # Public API
//! GET  /api/menu               - Business info, category counts, filtered products
//!                                (?category=<id|all>&q=<search>)
//! POST /api/reservations       - Request a reservation (rate limited)
//!
//! # Admin API (x-admin-password header, rate limited)
//! POST   /api/admin/login                      - Password check (stricter limit, no header)
//! GET    /api/admin/data                       - Full state with freshness
//! POST   /api/admin/products                   - Add product
//! PUT    /api/admin/products/{id}              - Partial update
//! DELETE /api/admin/products/{id}              - Delete product
//! POST   /api/admin/categories                 - Add category (id from name)
//! PUT    /api/admin/categories/{id}            - Rename / change icon
//! DELETE /api/admin/categories/{id}            - Delete category
//! PUT    /api/admin/config                     - Business config
//! PUT    /api/admin/images                     - Site images
//! PUT    /api/admin/about                      - About section
//! PUT    /api/admin/social                     - Social links
//! POST   /api/admin/uploads                    - Multipart image -> data URL
//! GET    /api/admin/reservations               - Pending / confirmed
//! POST   /api/admin/reservations/{id}/confirm  - Confirm reservation
//! DELETE /api/admin/reservations/{id}          - Delete reservation
//! POST   /api/admin/reset                      - Local-only reset to defaults
//! ```

pub mod admin;
pub mod manifest;
pub mod menu;
pub mod reservations;

use axum::{
    Router,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use dulsan_core::types::image::MAX_INLINE_BYTES;

use crate::middleware::rate_limit::RateLimiterLayer;
use crate::middleware::{
    ClientIpKeyExtractor, admin_rate_limiter, login_rate_limiter, reservation_rate_limiter,
};
use crate::state::AppState;

/// Multipart framing on top of the image itself.
pub const UPLOAD_OVERHEAD: usize = 64 * 1024;

/// Apply `limiter` to every route of `router` when rate limiting is on
/// (`keys` is `Some`).
fn limited(
    router: Router<AppState>,
    keys: Option<ClientIpKeyExtractor>,
    limiter: fn(ClientIpKeyExtractor) -> RateLimiterLayer,
) -> Router<AppState> {
    match keys {
        Some(keys) => router.route_layer(limiter(keys)),
        None => router,
    }
}

/// Create the public API routes router.
pub fn public_routes(rate_limit: Option<ClientIpKeyExtractor>) -> Router<AppState> {
    let reservations = limited(
        Router::new().route("/reservations", post(reservations::create)),
        rate_limit,
        reservation_rate_limiter,
    );

    Router::new()
        .route("/menu", get(menu::show))
        .merge(reservations)
}

/// Create the admin API routes router.
///
/// Every route is limited, since each one checks the password; login gets a
/// stricter limit on top.
pub fn admin_routes(rate_limit: Option<ClientIpKeyExtractor>) -> Router<AppState> {
    let login = limited(
        Router::new().route("/login", post(admin::login)),
        rate_limit,
        login_rate_limiter,
    );

    let admin = Router::new()
        .route("/data", get(admin::data))
        .route("/products", post(admin::create_product))
        .route(
            "/products/{id}",
            put(admin::update_product).delete(admin::delete_product),
        )
        .route("/categories", post(admin::create_category))
        .route(
            "/categories/{id}",
            put(admin::update_category).delete(admin::delete_category),
        )
        .route("/config", put(admin::save_config))
        .route("/images", put(admin::save_images))
        .route("/about", put(admin::save_about))
        .route("/social", put(admin::save_social))
        .route(
            "/uploads",
            post(admin::upload).layer(DefaultBodyLimit::max(MAX_INLINE_BYTES + UPLOAD_OVERHEAD)),
        )
        .route("/reservations", get(admin::reservations))
        .route(
            "/reservations/{id}/confirm",
            post(admin::confirm_reservation),
        )
        .route("/reservations/{id}", delete(admin::delete_reservation))
        .route("/reset", post(admin::reset))
        .merge(login);

    limited(admin, rate_limit, admin_rate_limiter)
}

/// Create all routes for the storefront.
///
/// `rate_limit` is the client key extractor, or `None` to disable limiting.
pub fn routes(rate_limit: Option<ClientIpKeyExtractor>) -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .route("/manifest.webmanifest", get(manifest::webmanifest))
        .nest(
            "/api",
            public_routes(rate_limit).nest("/admin", admin_routes(rate_limit)),
        )
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable until the live subscriptions are running.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.data().is_connected() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
