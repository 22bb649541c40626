//! Configuration Module
//!
//! Handles loading and managing proxy configuration from environment variables.

use std::env;

use crate::cache::MAX_CAPACITY;

/// Proxy configuration parameters.
///
/// All values can be configured via environment variables with sensible
/// defaults. Upstream coordinates are optional: their absence surfaces as a
/// classified error when the upstream is first contacted, not at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the upstream drug database API
    pub upstream_base_url: Option<String>,
    /// Username for the upstream login endpoint
    pub upstream_username: Option<String>,
    /// Password for the upstream login endpoint
    pub upstream_password: Option<String>,
    /// Path of the upstream login endpoint, relative to the base URL
    pub login_path: String,
    /// Serve canned fixture data instead of calling the real upstream
    pub use_mock_upstream: bool,
    /// Maximum number of entries the response cache can hold
    pub max_cache_entries: usize,
    /// TTL in seconds for cached search responses
    pub search_ttl: u64,
    /// TTL in seconds for cached detail responses
    pub detail_ttl: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `UPSTREAM_BASE_URL` - Base URL of the upstream API (no default)
    /// - `UPSTREAM_USERNAME` - Upstream login username (no default)
    /// - `UPSTREAM_PASSWORD` - Upstream login password (no default)
    /// - `UPSTREAM_LOGIN_PATH` - Login endpoint path (default: /auth/login)
    /// - `USE_MOCK_UPSTREAM` - Serve fixture data (default: false)
    /// - `MAX_CACHE_ENTRIES` - Maximum cache entries (default: 1000)
    /// - `SEARCH_TTL` - Search response TTL in seconds (default: 3600)
    /// - `DETAIL_TTL` - Detail response TTL in seconds (default: 86400)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 60)
    pub fn from_env() -> Self {
        Self {
            upstream_base_url: env::var("UPSTREAM_BASE_URL").ok(),
            upstream_username: env::var("UPSTREAM_USERNAME").ok(),
            upstream_password: env::var("UPSTREAM_PASSWORD").ok(),
            login_path: env::var("UPSTREAM_LOGIN_PATH")
                .unwrap_or_else(|_| "/auth/login".to_string()),
            use_mock_upstream: env::var("USE_MOCK_UPSTREAM")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            max_cache_entries: env::var("MAX_CACHE_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(MAX_CAPACITY),
            search_ttl: env::var("SEARCH_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3600),
            detail_ttl: env::var("DETAIL_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(86400),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            cleanup_interval: env::var("CLEANUP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            upstream_base_url: None,
            upstream_username: None,
            upstream_password: None,
            login_path: "/auth/login".to_string(),
            use_mock_upstream: false,
            max_cache_entries: MAX_CAPACITY,
            search_ttl: 3600,
            detail_ttl: 86400,
            server_port: 3000,
            cleanup_interval: 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.upstream_base_url.is_none());
        assert!(config.upstream_username.is_none());
        assert!(!config.use_mock_upstream);
        assert_eq!(config.login_path, "/auth/login");
        assert_eq!(config.max_cache_entries, 1000);
        assert_eq!(config.search_ttl, 3600);
        assert_eq!(config.detail_ttl, 86400);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cleanup_interval, 60);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("UPSTREAM_LOGIN_PATH");
        env::remove_var("USE_MOCK_UPSTREAM");
        env::remove_var("MAX_CACHE_ENTRIES");
        env::remove_var("SEARCH_TTL");
        env::remove_var("DETAIL_TTL");
        env::remove_var("SERVER_PORT");
        env::remove_var("CLEANUP_INTERVAL");

        let config = Config::from_env();
        assert_eq!(config.login_path, "/auth/login");
        assert!(!config.use_mock_upstream);
        assert_eq!(config.max_cache_entries, 1000);
        assert_eq!(config.search_ttl, 3600);
        assert_eq!(config.detail_ttl, 86400);
        assert_eq!(config.cleanup_interval, 60);
    }
}
