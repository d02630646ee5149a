//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `DULSAN_HOST` - Bind address (default: 127.0.0.1)
//! - `DULSAN_PORT` - Listen port (default: 3000)
//! - `DULSAN_DATABASE_URL` - `PostgreSQL` connection string for the shared
//!   document store (falls back to `DATABASE_URL`; without either the server
//!   runs on an in-process store)
//! - `DULSAN_CACHE_DIR` - Local cache directory (default: .dulsan-cache)
//! - `DULSAN_RATE_LIMIT` - Set to `false` to disable rate limiting (default: true)
//! - `DULSAN_TRUST_PROXY` - Set to `true` behind Cloudflare or the Fly.io proxy so
//!   rate limits key on the forwarded client address (default: false)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.1)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Shared document store (contains password). `None` runs in-process.
    pub database_url: Option<SecretString>,
    /// Directory of the local cache
    pub cache_dir: PathBuf,
    /// Whether the reservation and admin endpoints are rate limited
    pub rate_limit: bool,
    /// Whether client addresses are read from proxy headers
    pub trust_proxy_headers: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. production, staging)
    pub sentry_environment: Option<String>,
    /// Error event sample rate
    pub sentry_sample_rate: f32,
    /// Performance transaction sample rate
    pub sentry_traces_sample_rate: f32,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_vars(env: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = get_env_or_default(&env, "DULSAN_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("DULSAN_HOST".to_string(), e.to_string()))?;

        let port = get_env_or_default(&env, "DULSAN_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("DULSAN_PORT".to_string(), e.to_string()))?;

        let database_url = get_database_url(&env, "DULSAN_DATABASE_URL")?;
        let cache_dir = PathBuf::from(get_env_or_default(&env, "DULSAN_CACHE_DIR", ".dulsan-cache"));

        let rate_limit = get_env_or_default(&env, "DULSAN_RATE_LIMIT", "true")
            .parse::<bool>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("DULSAN_RATE_LIMIT".to_string(), e.to_string())
            })?;

        let trust_proxy_headers = get_env_or_default(&env, "DULSAN_TRUST_PROXY", "false")
            .parse::<bool>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("DULSAN_TRUST_PROXY".to_string(), e.to_string())
            })?;

        let sentry_dsn = env("SENTRY_DSN");
        let sentry_environment = env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.1);

        Ok(Self {
            host,
            port,
            database_url,
            cache_dir,
            rate_limit,
            trust_proxy_headers,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an environment variable with a default value.
fn get_env_or_default(env: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    env(key).unwrap_or_else(|| default.to_string())
}

/// Get database URL with fallback to generic `DATABASE_URL` (used by Fly.io postgres attach).
///
/// Absent is fine; present but not a `postgres://` URL is an error.
fn get_database_url(
    env: &impl Fn(&str) -> Option<String>,
    primary_key: &str,
) -> Result<Option<SecretString>, ConfigError> {
    let Some((key, value)) = env(primary_key)
        .map(|v| (primary_key, v))
        .or_else(|| env("DATABASE_URL").map(|v| ("DATABASE_URL", v)))
    else {
        return Ok(None);
    };

    let secret = SecretString::from(value);
    let url = Url::parse(secret.expose_secret())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "postgres" | "postgresql") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    Ok(Some(secret))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert!(config.database_url.is_none());
        assert_eq!(config.cache_dir, PathBuf::from(".dulsan-cache"));
        assert!(config.rate_limit);
        assert!(!config.trust_proxy_headers);
        assert!((config.sentry_sample_rate - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_database_url_fallback() {
        let config = load(&[("DATABASE_URL", "postgres://localhost/dulsan")]).unwrap();
        assert_eq!(
            config.database_url.unwrap().expose_secret(),
            "postgres://localhost/dulsan"
        );

        let config = load(&[
            ("DULSAN_DATABASE_URL", "postgresql://primary/dulsan"),
            ("DATABASE_URL", "postgres://fallback/dulsan"),
        ])
        .unwrap();
        assert_eq!(
            config.database_url.unwrap().expose_secret(),
            "postgresql://primary/dulsan"
        );
    }

    #[test]
    fn test_database_url_rejects_other_schemes() {
        let err = load(&[("DULSAN_DATABASE_URL", "mysql://localhost/dulsan")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "DULSAN_DATABASE_URL"));
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[("DULSAN_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "DULSAN_PORT"));
    }

    #[test]
    fn test_debug_redacts_database_url() {
        let config = load(&[("DULSAN_DATABASE_URL", "postgres://user:hunter2@db/dulsan")]).unwrap();
        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("hunter2"));
    }

    #[test]
    fn test_rate_limit_toggle() {
        assert!(!load(&[("DULSAN_RATE_LIMIT", "false")]).unwrap().rate_limit);
        assert!(load(&[("DULSAN_RATE_LIMIT", "maybe")]).is_err());
    }

    #[test]
    fn test_trust_proxy_toggle() {
        assert!(load(&[("DULSAN_TRUST_PROXY", "true")]).unwrap().trust_proxy_headers);
        assert!(load(&[("DULSAN_TRUST_PROXY", "yes")]).is_err());
    }
}
