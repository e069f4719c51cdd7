//! Client configuration: defaults, optional TOML file, environment overrides.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use stockdash_api::TransportConfig;
use url::Url;

use crate::error::ConfigError;

pub const ENV_API_URL: &str = "STOCKDASH_API_URL";
pub const ENV_TIMEOUT_MS: &str = "STOCKDASH_TIMEOUT_MS";
pub const ENV_RETRIES: &str = "STOCKDASH_RETRIES";
pub const ENV_RETRY_DELAY_MS: &str = "STOCKDASH_RETRY_DELAY_MS";

/// Connection and retry settings, fixed when the client is built.
///
/// ```toml
/// base_url = "http://localhost:8000/api"
/// timeout_ms = 10000
/// retries = 3
/// retry_delay_ms = 1000
/// ```
///
/// Every key is optional in a file; missing keys keep their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiClientConfig {
    pub base_url: String,
    /// Upper bound for a single attempt, in milliseconds.
    pub timeout_ms: u64,
    /// Additional attempts after the first one for transient failures.
    pub retries: u32,
    /// Fixed wait between attempts, in milliseconds.
    pub retry_delay_ms: u64,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            timeout_ms: 10_000,
            retries: 3,
            retry_delay_ms: 1_000,
        }
    }
}

impl ApiClientConfig {
    /// Defaults, then `path` if given, then environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(p) => Self::from_toml_file(p)?,
            None => Self::default(),
        };
        Ok(base.with_env_overrides())
    }

    /// Defaults overridden by environment variables.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Applies `STOCKDASH_*` environment variables. Unparsable values are ignored.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    pub(crate) fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.base_url = url.trim().to_string();
        }
        self.timeout_ms = parse_or(&lookup, ENV_TIMEOUT_MS, self.timeout_ms);
        self.retries = parse_or(&lookup, ENV_RETRIES, self.retries);
        self.retry_delay_ms = parse_or(&lookup, ENV_RETRY_DELAY_MS, self.retry_delay_ms);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.base_url).map_err(|_| ConfigError::InvalidBaseUrl(self.base_url.clone()))?;
        if self.timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig {
            base_url: self.base_url.clone(),
            timeout: self.timeout(),
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(val) => val.trim().parse::<T>().unwrap_or_else(|_| {
            tracing::warn!("ignoring unparsable {}={:?}", key, val);
            default
        }),
        None => default,
    }
}
