//! Configuration Module
//!
//! Handles loading the request helper configuration from environment variables.

use std::env;

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: f64 = 40.0;

/// Request helper configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Cache TTL in seconds, 0 keeps the cache disabled
    pub cache_ttl: f64,
    /// Per-request timeout in seconds
    pub request_timeout: f64,
    /// User agent sent by the HTTP transport
    pub user_agent: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_TTL` - Cache TTL in seconds (default: 0, disabled)
    /// - `HTTP_TIMEOUT` - Request timeout in seconds (default: 40)
    /// - `USER_AGENT` - User agent header (default: `json_request_cache/<version>`)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_ttl: env::var("CACHE_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cache_ttl),
            request_timeout: env::var("HTTP_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.request_timeout),
            user_agent: env::var("USER_AGENT").unwrap_or(defaults.user_agent),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_ttl: 0.0,
            request_timeout: DEFAULT_TIMEOUT_SECS,
            user_agent: concat!("json_request_cache/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
