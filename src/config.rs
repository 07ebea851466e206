//! Store service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `STORE_HOST` - Bind address (default: 0.0.0.0)
//! - `STORE_PORT` - Listen port (default: 8000)
//! - `STORE_CATALOG_PATH` - JSON product file (default: bundled catalog)
//! - `STORE_CHECKOUT_DELAY_MS` - Simulated checkout time (default: 2000)
//! - `STORE_NOTIFICATION_TTL_MS` - Notification lifetime (default: 5000)

use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
    time::Duration,
};

use thiserror::Error;

use crate::{
    store::state::DEFAULT_CHECKOUT_DELAY, tools::notifications::DEFAULT_NOTIFICATION_TTL,
};

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Store service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Product data file; `None` uses the bundled catalog
    pub catalog_path: Option<PathBuf>,
    pub checkout_delay: Duration,
    pub notification_ttl: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8000,
            catalog_path: None,
            checkout_delay: DEFAULT_CHECKOUT_DELAY,
            notification_ttl: DEFAULT_NOTIFICATION_TTL,
        }
    }
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let host = parse_or(&lookup, "STORE_HOST", defaults.host)?;
        let port = parse_or(&lookup, "STORE_PORT", defaults.port)?;
        let catalog_path = lookup("STORE_CATALOG_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        let checkout_delay =
            parse_millis_or(&lookup, "STORE_CHECKOUT_DELAY_MS", defaults.checkout_delay)?;
        let notification_ttl =
            parse_millis_or(&lookup, "STORE_NOTIFICATION_TTL_MS", defaults.notification_ttl)?;

        Ok(Self {
            host,
            port,
            catalog_path,
            checkout_delay,
            notification_ttl,
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

/// Parse a variable, falling back to `default` when unset.
fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}

/// Parse a millisecond count into a `Duration`.
fn parse_millis_or(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Duration,
) -> Result<Duration, ConfigError> {
    match lookup(key) {
        Some(_) => parse_or(lookup, key, 0u64).map(Duration::from_millis),
        None => Ok(default),
    }
}
