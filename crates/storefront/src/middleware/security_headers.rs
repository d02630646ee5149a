//! Security headers for API responses.
//!
//! The server only returns JSON and the web app manifest, never documents, so
//! the content policy denies everything. Admin responses (full state,
//! customer phone numbers) are never stored; public ones are revalidated on
//! every request.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue, header::CACHE_CONTROL},
    middleware::Next,
    response::Response,
};

/// Path prefix of the password-protected routes.
const ADMIN_PREFIX: &str = "/api/admin";

/// Headers applied to every response.
const STATIC_HEADERS: [(&str, &str); 6] = [
    ("x-frame-options", "DENY"),
    ("x-content-type-options", "nosniff"),
    ("referrer-policy", "no-referrer"),
    (
        "content-security-policy",
        "default-src 'none'; frame-ancestors 'none'; base-uri 'none'; form-action 'none'",
    ),
    ("cross-origin-opener-policy", "same-origin"),
    ("cross-origin-resource-policy", "same-origin"),
];

/// Add security and caching headers to every response.
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let is_admin = request.uri().path().starts_with(ADMIN_PREFIX);
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    for (name, value) in STATIC_HEADERS {
        headers.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
    }

    let cache = if is_admin {
        "no-store, max-age=0"
    } else {
        "no-cache"
    };
    headers.insert(CACHE_CONTROL, HeaderValue::from_static(cache));

    response
}
