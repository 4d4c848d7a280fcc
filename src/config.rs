//! Configuration Module
//!
//! Handles loading the cache and directory client configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

/// Default account server queried for public gateway information.
pub const DEFAULT_ACCOUNT_SERVER: &str = "https://account.thethingsnetwork.org";

/// Cache and directory configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the account server
    pub account_server: String,
    /// Milliseconds between rate limiter refills
    pub request_interval_ms: u64,
    /// Maximum outstanding permits, also granted at startup
    pub request_burst: usize,
    /// Seconds after which a cached entry is refreshed on read, 0 disables refresh
    pub expire_secs: u64,
    /// Per-request timeout of the directory client in seconds
    pub directory_timeout_secs: u64,
    /// JSON file of gateway records served instead of the account server
    pub directory_file: Option<String>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `ACCOUNT_SERVER` - Account server base URL (default: the public TTN account server)
    /// - `REQUEST_INTERVAL_MS` - Refill interval in milliseconds (default: 50)
    /// - `REQUEST_BURST` - Burst size (default: 50)
    /// - `INFO_EXPIRE_SECS` - Entry expiry in seconds (default: 0, never refresh)
    /// - `DIRECTORY_TIMEOUT_SECS` - Directory request timeout (default: 10)
    /// - `DIRECTORY_FILE` - Serve records from this JSON file (default: unset)
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            account_server: env::var("ACCOUNT_SERVER").unwrap_or(defaults.account_server),
            request_interval_ms: parse_var("REQUEST_INTERVAL_MS", defaults.request_interval_ms)?,
            request_burst: parse_var("REQUEST_BURST", defaults.request_burst)?,
            expire_secs: parse_var("INFO_EXPIRE_SECS", defaults.expire_secs)?,
            directory_timeout_secs: parse_var(
                "DIRECTORY_TIMEOUT_SECS",
                defaults.directory_timeout_secs,
            )?,
            directory_file: env::var("DIRECTORY_FILE").ok().filter(|v| !v.is_empty()),
        };
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the cache cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_burst == 0 {
            return Err(ConfigError::ZeroBurst);
        }
        Ok(())
    }

    pub fn request_interval(&self) -> Duration {
        Duration::from_millis(self.request_interval_ms)
    }

    /// Expiry applied to every entry, `None` when auto-refresh is disabled.
    pub fn expiry(&self) -> Option<Duration> {
        (self.expire_secs > 0).then(|| Duration::from_secs(self.expire_secs))
    }

    pub fn directory_timeout(&self) -> Duration {
        Duration::from_secs(self.directory_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            account_server: DEFAULT_ACCOUNT_SERVER.to_string(),
            request_interval_ms: 50,
            request_burst: 50,
            expire_secs: 0,
            directory_timeout_secs: 10,
            directory_file: None,
        }
    }
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        Err(_) => Ok(default),
    }
}
