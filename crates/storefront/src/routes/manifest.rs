//! Web app manifest route handler.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use dulsan_core::manifest::WebManifest;

use crate::error::AppError;
use crate::state::AppState;

/// Serve the web app manifest built from the current business config.
///
/// Name, colors and icons follow admin edits without a restart.
pub async fn webmanifest(State(state): State<AppState>) -> Response {
    let manifest = state
        .data()
        .read(|s| WebManifest::new(&s.config.value, &s.images.value));

    match serde_json::to_string(&manifest) {
        Ok(body) => ([(header::CONTENT_TYPE, "application/manifest+json")], body).into_response(),
        Err(e) => AppError::Internal(e.to_string()).into_response(),
    }
}
