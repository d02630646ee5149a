//! Rate limiting middleware using governor and `tower_governor`.
//!
//! Provides rate limiters for the endpoints that take untrusted input:
//! - `admin_rate_limiter`: Every admin route, so the shared password cannot be
//!   guessed through any of them (~30/min)
//! - `login_rate_limiter`: Strict limits for the admin password check (~10/min)
//! - `reservation_rate_limiter`: Limits for reservation requests (~4/min)
//!
//! Clients are keyed by the peer address. Proxy headers are only read when the
//! server is configured to sit behind a proxy that sets them
//! (`DULSAN_TRUST_PROXY`); otherwise any client could pick its own key.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::extract::ConnectInfo;
use axum::http::Request;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

// =============================================================================
// Client IP Key Extractor
// =============================================================================

/// Proxy headers carrying the client address, most trusted first.
/// `x-forwarded-for` may hold a chain; its first entry is the client.
const CLIENT_IP_HEADERS: [&str; 4] = [
    "cf-connecting-ip",
    "x-forwarded-for",
    "x-real-ip",
    "fly-client-ip",
];

/// Key extractor for the client address.
///
/// Behind a trusted proxy it checks the Cloudflare and Fly.io headers first;
/// either way it falls back to the peer address of the connection.
#[derive(Debug, Clone, Copy)]
pub struct ClientIpKeyExtractor {
    trust_proxy: bool,
}

impl ClientIpKeyExtractor {
    #[must_use]
    pub const fn new(trust_proxy: bool) -> Self {
        Self { trust_proxy }
    }
}

impl tower_governor::key_extractor::KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        if self.trust_proxy {
            let from_headers = CLIENT_IP_HEADERS.iter().find_map(|name| {
                req.headers()
                    .get(*name)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.split(',').next())
                    .and_then(|s| s.trim().parse::<IpAddr>().ok())
            });
            if let Some(ip) = from_headers {
                return Ok(ip);
            }
        }

        req.extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
            .ok_or(GovernorError::UnableToExtractKey)
    }
}

// =============================================================================
// Rate Limiter Configuration
// =============================================================================

/// Rate limiter layer type for Axum, keyed by client IP.
pub type RateLimiterLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// One token every `replenish_secs`, up to `burst` at once.
///
/// # Panics
///
/// Panics if either value is zero. Every caller passes constants.
fn per_client(keys: ClientIpKeyExtractor, replenish_secs: u64, burst: u32) -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(keys)
        .per_second(replenish_secs)
        .burst_size(burst)
        .finish()
        .expect("rate limiter period and burst are non-zero");
    GovernorLayer::new(Arc::new(config))
}

/// Admin routes: ~30 per minute per IP, burst of 20.
///
/// Every admin route checks the password, so each request is also a guess.
#[must_use]
pub fn admin_rate_limiter(keys: ClientIpKeyExtractor) -> RateLimiterLayer {
    per_client(keys, 2, 20)
}

/// Admin password checks: ~10 per minute per IP, burst of 5.
///
/// The password is a plain shared secret, so guessing must stay slow.
#[must_use]
pub fn login_rate_limiter(keys: ClientIpKeyExtractor) -> RateLimiterLayer {
    per_client(keys, 6, 5)
}

/// Reservation requests: ~4 per minute per IP, burst of 3.
#[must_use]
pub fn reservation_rate_limiter(keys: ClientIpKeyExtractor) -> RateLimiterLayer {
    per_client(keys, 15, 3)
}

#[cfg(test)]
mod tests {
    use tower_governor::key_extractor::KeyExtractor;

    use super::*;

    const BEHIND_PROXY: ClientIpKeyExtractor = ClientIpKeyExtractor::new(true);
    const DIRECT: ClientIpKeyExtractor = ClientIpKeyExtractor::new(false);

    fn request() -> axum::http::request::Builder {
        Request::builder().uri("/api/reservations")
    }

    fn peer() -> SocketAddr {
        "192.0.2.5:5000".parse().expect("addr")
    }

    #[test]
    fn test_prefers_cloudflare_header() {
        let req = request()
            .header("x-forwarded-for", "10.0.0.1, 10.0.0.2")
            .header("cf-connecting-ip", "203.0.113.7")
            .body(())
            .expect("request");
        let ip = BEHIND_PROXY.extract(&req).expect("key");
        assert_eq!(ip, "203.0.113.7".parse::<IpAddr>().expect("ip"));
    }

    #[test]
    fn test_first_forwarded_address() {
        let req = request()
            .header("x-forwarded-for", "10.0.0.1, 10.0.0.2")
            .body(())
            .expect("request");
        let ip = BEHIND_PROXY.extract(&req).expect("key");
        assert_eq!(ip, "10.0.0.1".parse::<IpAddr>().expect("ip"));
    }

    #[test]
    fn test_falls_back_to_peer_address() {
        let mut req = request().body(()).expect("request");
        assert!(BEHIND_PROXY.extract(&req).is_err());

        req.extensions_mut().insert(ConnectInfo(peer()));
        assert_eq!(BEHIND_PROXY.extract(&req).expect("key"), peer().ip());
    }

    #[test]
    fn test_direct_clients_cannot_choose_their_key() {
        let mut spoofed = Vec::new();
        for forwarded in ["198.51.100.1", "198.51.100.2"] {
            let mut req = request()
                .header("x-forwarded-for", forwarded)
                .header("x-real-ip", forwarded)
                .header("cf-connecting-ip", forwarded)
                .body(())
                .expect("request");
            req.extensions_mut().insert(ConnectInfo(peer()));
            spoofed.push(DIRECT.extract(&req).expect("key"));
        }
        assert_eq!(spoofed, vec![peer().ip(), peer().ip()]);
    }
}
