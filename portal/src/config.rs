//! Configuration management for the portal.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Call `dotenvy::dotenv()` first to pick up a local `.env` file.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while reading configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A numeric variable could not be parsed
    #[error("Invalid value for {key}: {value:?} is not a valid number")]
    InvalidNumber {
        /// Environment variable name
        key: &'static str,
        /// Raw value
        value: String,
    },

    /// The API base URL is not a valid absolute URL
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    InvalidUrl {
        /// Environment variable name
        key: &'static str,
        /// Raw value
        value: String,
        /// Parser message
        reason: String,
    },
}

/// Portal configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PortalConfig {
    /// Base URL of the rental REST API (`AUTOHIRE_API_URL`)
    pub api_url: String,
    /// Directory holding durable client storage (`AUTOHIRE_STATE_DIR`)
    pub state_dir: PathBuf,
    /// HTTP request timeout (`AUTOHIRE_HTTP_TIMEOUT_SECS`)
    pub http_timeout: Duration,
    /// Capacity of the store's action broadcast (`AUTOHIRE_BROADCAST_CAPACITY`)
    pub broadcast_capacity: usize,
    /// How long shutdown waits for in-flight effects (`AUTOHIRE_SHUTDOWN_TIMEOUT_SECS`)
    pub shutdown_timeout: Duration,
    /// Log filter used when `RUST_LOG` is unset (`AUTOHIRE_LOG`)
    pub log_filter: String,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:3000".to_string(),
            state_dir: PathBuf::from(".autohire"),
            http_timeout: Duration::from_secs(10),
            broadcast_capacity: 64,
            shutdown_timeout: Duration::from_secs(5),
            log_filter: "autohire=info".to_string(),
        }
    }
}

impl PortalConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a numeric variable does not parse or the
    /// API URL is not absolute.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`PortalConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_url = lookup("AUTOHIRE_API_URL").unwrap_or(defaults.api_url);
        url::Url::parse(&api_url).map_err(|e| ConfigError::InvalidUrl {
            key: "AUTOHIRE_API_URL",
            value: api_url.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            api_url,
            state_dir: lookup("AUTOHIRE_STATE_DIR").map_or(defaults.state_dir, PathBuf::from),
            http_timeout: seconds(&lookup, "AUTOHIRE_HTTP_TIMEOUT_SECS", defaults.http_timeout)?,
            broadcast_capacity: number(&lookup, "AUTOHIRE_BROADCAST_CAPACITY", defaults.broadcast_capacity)?,
            shutdown_timeout: seconds(
                &lookup,
                "AUTOHIRE_SHUTDOWN_TIMEOUT_SECS",
                defaults.shutdown_timeout,
            )?,
            log_filter: lookup("AUTOHIRE_LOG").unwrap_or(defaults.log_filter),
        })
    }
}

fn number<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { key, value }),
    }
}

fn seconds<F>(lookup: &F, key: &'static str, default: Duration) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    number(lookup, key, default.as_secs()).map(Duration::from_secs)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = PortalConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, PortalConfig::default());
    }

    #[test]
    fn overrides_are_read() {
        let config = PortalConfig::from_lookup(lookup(&[
            ("AUTOHIRE_API_URL", "https://rent.example.com/api"),
            ("AUTOHIRE_HTTP_TIMEOUT_SECS", "3"),
            ("AUTOHIRE_BROADCAST_CAPACITY", "8"),
        ]))
        .unwrap();

        assert_eq!(config.api_url, "https://rent.example.com/api");
        assert_eq!(config.http_timeout, Duration::from_secs(3));
        assert_eq!(config.broadcast_capacity, 8);
        assert_eq!(config.shutdown_timeout, Duration::from_secs(5));
    }

    #[test]
    fn invalid_number_is_reported() {
        let error =
            PortalConfig::from_lookup(lookup(&[("AUTOHIRE_HTTP_TIMEOUT_SECS", "soon")])).unwrap_err();

        assert_eq!(
            error,
            ConfigError::InvalidNumber {
                key: "AUTOHIRE_HTTP_TIMEOUT_SECS",
                value: "soon".to_string(),
            }
        );
    }

    #[test]
    fn relative_api_url_is_rejected() {
        let error = PortalConfig::from_lookup(lookup(&[("AUTOHIRE_API_URL", "/api")])).unwrap_err();
        assert!(matches!(error, ConfigError::InvalidUrl { .. }));
    }
}
