//! Onboarding and free-trial flags, optionally persisted as JSON.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::PersistencePolicy;

/// Preference storage errors
#[derive(Error, Debug)]
pub enum PreferencesError {
    /// Reading or writing the preference file failed
    #[error("Preference file {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Serialization failed
    #[error("Preference serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Flags that may survive a restart
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// The onboarding carousel was completed
    pub onboarding_completed: bool,
    /// The one-shot free trial was consumed
    pub free_trial_used: bool,
}

/// Loads and saves [`Preferences`] according to a [`PersistencePolicy`]
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    policy: PersistencePolicy,
    path: PathBuf,
}

impl PreferenceStore {
    /// Store backed by `path`
    pub fn new(policy: PersistencePolicy, path: impl Into<PathBuf>) -> Self {
        Self {
            policy,
            path: path.into(),
        }
    }

    /// Active policy
    pub fn policy(&self) -> PersistencePolicy {
        self.policy
    }

    /// File location
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load saved preferences.
    ///
    /// Ephemeral stores always start from defaults. A missing or corrupt file
    /// also yields defaults.
    pub fn load(&self) -> Preferences {
        if self.policy == PersistencePolicy::Ephemeral {
            return Preferences::default();
        }
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                debug!("No preferences at {}: {}", self.path.display(), e);
                return Preferences::default();
            }
        };
        serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!("Ignoring unreadable preferences {}: {}", self.path.display(), e);
            Preferences::default()
        })
    }

    /// Save preferences. No-op for ephemeral stores.
    pub fn save(&self, prefs: &Preferences) -> Result<(), PreferencesError> {
        if self.policy == PersistencePolicy::Ephemeral {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| PreferencesError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(prefs)?;
        std::fs::write(&self.path, json).map_err(|source| PreferencesError::Io {
            path: self.path.clone(),
            source,
        })
    }
}
