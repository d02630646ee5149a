//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers (CSP, frame denial, etc.)
//! 5. Rate limiting (governor, reservation and admin routes only)
//!
//! Admin routes additionally extract [`RequireAdmin`].

pub mod auth;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;

pub use auth::{ADMIN_PASSWORD_HEADER, RequireAdmin};
pub use rate_limit::{
    ClientIpKeyExtractor, admin_rate_limiter, login_rate_limiter, reservation_rate_limiter,
};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
