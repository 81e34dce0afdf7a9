//! Quickcart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional:
//! - `REDIS_URL` - Redis connection string (default: `redis://127.0.0.1:6379/0`)
//! - `QUICKCART_NAMESPACE` - Prefix applied to every store key (default: none)
//! - `QUICKCART_COMMAND_TIMEOUT_MS` - Per round-trip timeout (default: 5000)
//! - `QUICKCART_CONNECT_TIMEOUT_MS` - Initial connection timeout (default: 5000)

use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

use crate::keys::Keys;

const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379/0";
const DEFAULT_TIMEOUT_MS: &str = "5000";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Quickcart configuration.
///
/// Implements `Debug` manually to redact the connection string, which may
/// carry a password.
#[derive(Clone)]
pub struct QuickcartConfig {
    /// Redis connection URL
    pub redis_url: SecretString,
    /// Optional prefix for every key
    pub namespace: Option<String>,
    /// Upper bound on each store round-trip
    pub command_timeout: Duration,
    /// Upper bound on establishing the first connection
    pub connect_timeout: Duration,
}

impl std::fmt::Debug for QuickcartConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuickcartConfig")
            .field("redis_url", &"[REDACTED]")
            .field("namespace", &self.namespace)
            .field("command_timeout", &self.command_timeout)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

impl Default for QuickcartConfig {
    fn default() -> Self {
        Self {
            redis_url: SecretString::from(DEFAULT_REDIS_URL),
            namespace: None,
            command_timeout: Duration::from_millis(5000),
            connect_timeout: Duration::from_millis(5000),
        }
    }
}

impl QuickcartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a timeout is not a positive integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let redis_url = SecretString::from(get_env_or_default("REDIS_URL", DEFAULT_REDIS_URL));
        let namespace = get_optional_env("QUICKCART_NAMESPACE").filter(|ns| !ns.is_empty());
        let command_timeout = parse_timeout_ms(
            "QUICKCART_COMMAND_TIMEOUT_MS",
            &get_env_or_default("QUICKCART_COMMAND_TIMEOUT_MS", DEFAULT_TIMEOUT_MS),
        )?;
        let connect_timeout = parse_timeout_ms(
            "QUICKCART_CONNECT_TIMEOUT_MS",
            &get_env_or_default("QUICKCART_CONNECT_TIMEOUT_MS", DEFAULT_TIMEOUT_MS),
        )?;

        Ok(Self {
            redis_url,
            namespace,
            command_timeout,
            connect_timeout,
        })
    }

    /// Key builder for the configured namespace.
    #[must_use]
    pub fn keys(&self) -> Keys {
        Keys::new(self.namespace.clone())
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a strictly positive millisecond count.
fn parse_timeout_ms(key: &str, value: &str) -> Result<Duration, ConfigError> {
    let ms = value
        .trim()
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if ms == 0 {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be greater than zero".to_string(),
        ));
    }
    Ok(Duration::from_millis(ms))
}
