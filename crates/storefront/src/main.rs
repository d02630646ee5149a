//! Dulsan Storefront - menu, reservations and admin API.
//!
//! This binary serves the bakery's menu on port 3000.
//!
//! # Architecture
//!
//! - Axum web framework serving a JSON API and the web app manifest
//! - An offline-first synchronization session (`dulsan-data`) holding the
//!   whole catalog in memory, mirrored to a local file cache
//! - A shared `PostgreSQL` document store when `DULSAN_DATABASE_URL` is set,
//!   otherwise an in-process store
//!
//! The server starts answering from the cache (or the built-in defaults)
//! immediately; `/health/ready` turns green once live sync is running.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;

use dulsan_data::{FileStorage, Local, LocalData, MemoryRemote, PgRemote, Remote};
use dulsan_storefront::config::StorefrontConfig;
use dulsan_storefront::state::AppState;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            traces_sample_rate: config.sentry_traces_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = StorefrontConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Initialize tracing with EnvFilter and Sentry integration
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "dulsan_storefront=info,dulsan_data=info,tower_http=debug".into());

    // Use JSON format on Fly.io for structured log parsing, text format locally
    let is_fly = std::env::var("FLY_APP_NAME").is_ok();
    let json_layer = is_fly.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!is_fly).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    // Shared document store. The pool connects on first use, so an
    // unreachable database leaves the server answering from the cache.
    // NOTE: Migrations are NOT run automatically on startup.
    // Run them explicitly via: cargo run -p dulsan-cli -- migrate
    let remote = match &config.database_url {
        Some(url) => Remote::from(
            PgRemote::connect_lazy(url).expect("Failed to parse the document store URL"),
        ),
        None => {
            tracing::warn!("No database configured, using an in-process document store");
            Remote::from(MemoryRemote::new())
        }
    };
    tracing::info!(backend = remote.kind(), "Document store configured");

    let storage = Local::from(
        FileStorage::open(&config.cache_dir).expect("Failed to open cache directory"),
    );
    tracing::info!(
        backend = storage.kind(),
        cache_dir = %config.cache_dir.display(),
        "Local cache opened"
    );

    let data = LocalData::new(remote, storage);

    // Seed and subscribe in the background; requests are served from the
    // restored state in the meantime
    let connecting = data.clone();
    tokio::spawn(async move { connecting.connect().await });

    let state = AppState::new(config.clone(), data.clone());

    // Build router
    let app = dulsan_storefront::app(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    // Start server
    let addr = config.socket_addr();
    tracing::info!("storefront listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .expect("Server error");

    // Let pending remote writes land before exiting
    data.shutdown();
    data.flush().await;
    tracing::info!("Shutdown complete");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
