//! Service configuration loaded from environment variables.
//!
//! Store credentials are not configured here: every request carries the
//! store it targets.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SYNC_HOST` - Bind address (default: 127.0.0.1)
//! - `SYNC_PORT` - Listen port (default: 3002)
//! - `SHOPIFY_REQUEST_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `SHOPIFY_CALL_DELAY_MS` - Delay after each store call (default: 800)
//! - `SHOPIFY_PAGE_DELAY_MS` - Delay between list pages (default: 500)
//! - `SHOPIFY_RATE_LIMIT_COOLDOWN_MS` - Wait before retrying a 429 (default: 2000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Trace sample rate (default: 1.0)
//! - `LOG_FORMAT` - `json` for JSON logs, anything else for text

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::sync::RateLimiter;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Sync service configuration.
#[derive(Clone)]
pub struct SyncConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Upper bound on a single Shopify HTTP call.
    pub request_timeout: Duration,
    pub call_delay: Duration,
    pub page_delay: Duration,
    pub rate_limit_cooldown: Duration,
    pub sentry_dsn: Option<String>,
    pub sentry_environment: Option<String>,
    pub sentry_sample_rate: f32,
    pub sentry_traces_sample_rate: f32,
    pub json_logs: bool,
}

impl std::fmt::Debug for SyncConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("request_timeout", &self.request_timeout)
            .field("call_delay", &self.call_delay)
            .field("page_delay", &self.page_delay)
            .field("rate_limit_cooldown", &self.rate_limit_cooldown)
            .field(
                "sentry_dsn",
                &self.sentry_dsn.as_ref().map(|_| "[REDACTED]"),
            )
            .field("sentry_environment", &self.sentry_environment)
            .field("json_logs", &self.json_logs)
            .finish_non_exhaustive()
    }
}

impl SyncConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host: IpAddr = parse_env("SYNC_HOST", "127.0.0.1")?;
        let port: u16 = parse_env("SYNC_PORT", "3002")?;
        let request_timeout = Duration::from_secs(parse_env("SHOPIFY_REQUEST_TIMEOUT_SECS", "30")?);
        let call_delay = Duration::from_millis(parse_env("SHOPIFY_CALL_DELAY_MS", "800")?);
        let page_delay = Duration::from_millis(parse_env("SHOPIFY_PAGE_DELAY_MS", "500")?);
        let rate_limit_cooldown =
            Duration::from_millis(parse_env("SHOPIFY_RATE_LIMIT_COOLDOWN_MS", "2000")?);

        if request_timeout.is_zero() {
            return Err(ConfigError::InvalidEnvVar(
                "SHOPIFY_REQUEST_TIMEOUT_SECS".to_string(),
                "must be greater than 0".to_string(),
            ));
        }

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let json_logs = get_optional_env("LOG_FORMAT").is_some_and(|f| f.eq_ignore_ascii_case("json"));

        Ok(Self {
            host,
            port,
            request_timeout,
            call_delay,
            page_delay,
            rate_limit_cooldown,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
            json_logs,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Pacing for bulk store operations.
    #[must_use]
    pub fn rate_limiter(&self) -> RateLimiter {
        RateLimiter::new(self.call_delay, self.page_delay, self.rate_limit_cooldown)
    }
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_value(key, &get_env_or_default(key, default))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config() -> SyncConfig {
        SyncConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3002,
            request_timeout: Duration::from_secs(30),
            call_delay: Duration::from_millis(800),
            page_delay: Duration::from_millis(500),
            rate_limit_cooldown: Duration::from_millis(2000),
            sentry_dsn: Some("https://key@o0.ingest.sentry.io/0".to_string()),
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
            json_logs: false,
        }
    }

    #[test]
    fn test_socket_addr() {
        let addr = config().socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3002);
    }

    #[test]
    fn test_rate_limiter_from_config() {
        let limiter = config().rate_limiter();
        assert_eq!(limiter.call_delay(), Duration::from_millis(800));
        assert_eq!(limiter.page_delay(), Duration::from_millis(500));
        assert_eq!(limiter.cooldown(), Duration::from_millis(2000));
    }

    #[test]
    fn test_parse_value() {
        let port: u16 = parse_value("SYNC_PORT", " 8080 ").unwrap();
        assert_eq!(port, 8080);

        let err = parse_value::<u16>("SYNC_PORT", "eighty").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "SYNC_PORT"));
        assert!(parse_value::<IpAddr>("SYNC_HOST", "localhost:80").is_err());
    }

    #[test]
    fn test_debug_redacts_sentry_dsn() {
        let debug = format!("{:?}", config());
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("ingest.sentry.io"));
    }
}
