//! Client configuration.
//!
//! All settings come from `BODYFAT_*` environment variables with built-in
//! defaults. [`ClientConfig::from_lookup`] takes the lookup as a closure so
//! callers (and tests) can supply values without touching the process
//! environment.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Production backend
pub const DEFAULT_API_URL: &str = "https://bodyfatai-backend.onrender.com";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Backend base URL
pub const ENV_API_URL: &str = "BODYFAT_API_URL";
/// Request timeout in seconds
pub const ENV_TIMEOUT: &str = "BODYFAT_HTTP_TIMEOUT_SECS";
/// `sandboxed` or `native`
pub const ENV_RUNTIME: &str = "BODYFAT_RUNTIME";
/// Purchase SDK api key
pub const ENV_PURCHASES_API_KEY: &str = "BODYFAT_PURCHASES_API_KEY";
/// `ephemeral` or `persistent`
pub const ENV_PERSISTENCE: &str = "BODYFAT_PERSISTENCE";
/// Preference file location
pub const ENV_PREFERENCES_PATH: &str = "BODYFAT_PREFERENCES_PATH";

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is set to a value that cannot be used
    #[error("Invalid value for {var}: '{value}' ({reason})")]
    InvalidValue {
        /// Variable name
        var: &'static str,
        /// Offending value
        value: String,
        /// What was expected
        reason: &'static str,
    },

    /// A variable required by another setting is missing
    #[error("{var} must be set when {because}")]
    Missing {
        /// Variable name
        var: &'static str,
        /// The setting that requires it
        because: &'static str,
    },
}

/// Runtime the client runs in, fixed at process start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// No native purchase capability; subscriptions are stubbed
    #[default]
    Sandboxed,
    /// Native purchase SDK available
    Native,
}

impl fmt::Display for RuntimeEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeEnvironment::Sandboxed => f.write_str("sandboxed"),
            RuntimeEnvironment::Native => f.write_str("native"),
        }
    }
}

impl FromStr for RuntimeEnvironment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sandboxed" | "sandbox" => Ok(RuntimeEnvironment::Sandboxed),
            "native" => Ok(RuntimeEnvironment::Native),
            _ => Err(()),
        }
    }
}

/// Whether onboarding and trial flags survive a restart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersistencePolicy {
    /// Flags reset on every launch
    #[default]
    Ephemeral,
    /// Flags are loaded at start and saved on change
    Persistent,
}

impl FromStr for PersistencePolicy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ephemeral" => Ok(PersistencePolicy::Ephemeral),
            "persistent" => Ok(PersistencePolicy::Persistent),
            _ => Err(()),
        }
    }
}

/// Settings for the backend client, subscription gate and preferences
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Backend base URL without trailing slash
    pub api_base_url: String,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Selects the subscription gate variant
    pub runtime: RuntimeEnvironment,
    /// Purchase SDK api key
    pub purchases_api_key: Option<String>,
    /// Preference persistence policy
    pub persistence: PersistencePolicy,
    /// Preference file location
    pub preferences_path: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            runtime: RuntimeEnvironment::default(),
            purchases_api_key: None,
            persistence: PersistencePolicy::default(),
            preferences_path: default_preferences_path(),
        }
    }
}

/// `<data_local_dir>/BodyFatAI/preferences.json`, or the working directory
/// when the platform has no data dir
pub fn default_preferences_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("BodyFatAI")
        .join("preferences.json")
}

impl ClientConfig {
    /// Load from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` to resolve variable names. Unset or blank
    /// variables fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(url) = get(ENV_API_URL) {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidValue {
                    var: ENV_API_URL,
                    value: url,
                    reason: "expected an http:// or https:// URL",
                });
            }
            config.api_base_url = url.trim_end_matches('/').to_string();
        }

        if let Some(raw) = get(ENV_TIMEOUT) {
            let secs = raw
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or(ConfigError::InvalidValue {
                    var: ENV_TIMEOUT,
                    value: raw.clone(),
                    reason: "expected a positive number of seconds",
                })?;
            config.request_timeout = Duration::from_secs(secs);
        }

        if let Some(raw) = get(ENV_RUNTIME) {
            config.runtime = raw.parse().map_err(|_| ConfigError::InvalidValue {
                var: ENV_RUNTIME,
                value: raw.clone(),
                reason: "expected 'sandboxed' or 'native'",
            })?;
        }

        config.purchases_api_key = get(ENV_PURCHASES_API_KEY);
        if config.runtime == RuntimeEnvironment::Native && config.purchases_api_key.is_none() {
            return Err(ConfigError::Missing {
                var: ENV_PURCHASES_API_KEY,
                because: "BODYFAT_RUNTIME is 'native'",
            });
        }

        if let Some(raw) = get(ENV_PERSISTENCE) {
            config.persistence = raw.parse().map_err(|_| ConfigError::InvalidValue {
                var: ENV_PERSISTENCE,
                value: raw.clone(),
                reason: "expected 'ephemeral' or 'persistent'",
            })?;
        }

        if let Some(path) = get(ENV_PREFERENCES_PATH) {
            config.preferences_path = PathBuf::from(path);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.api_base_url, DEFAULT_API_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert_eq!(config.runtime, RuntimeEnvironment::Sandboxed);
        assert_eq!(config.persistence, PersistencePolicy::Ephemeral);
        assert!(config.preferences_path.ends_with("BodyFatAI/preferences.json"));
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config =
            ClientConfig::from_lookup(lookup(&[(ENV_API_URL, "http://10.0.2.2:8000/")])).unwrap();
        assert_eq!(config.api_base_url, "http://10.0.2.2:8000");
    }

    #[test]
    fn test_native_requires_api_key() {
        let err = ClientConfig::from_lookup(lookup(&[(ENV_RUNTIME, "native")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing { var: ENV_PURCHASES_API_KEY, .. }));

        let ok = ClientConfig::from_lookup(lookup(&[
            (ENV_RUNTIME, "native"),
            (ENV_PURCHASES_API_KEY, "appl_test"),
        ]))
        .unwrap();
        assert_eq!(ok.runtime, RuntimeEnvironment::Native);
    }

    #[test]
    fn test_invalid_values_name_the_variable() {
        let err = ClientConfig::from_lookup(lookup(&[(ENV_TIMEOUT, "soon")])).unwrap_err();
        assert!(err.to_string().contains(ENV_TIMEOUT));

        let err = ClientConfig::from_lookup(lookup(&[(ENV_PERSISTENCE, "forever")])).unwrap_err();
        assert!(err.to_string().contains(ENV_PERSISTENCE));
    }
}
