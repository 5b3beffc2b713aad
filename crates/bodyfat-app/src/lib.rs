//! BodyFatAI terminal application
//!
//! [`AppState`] owns the wizard session and the injected services. Every
//! user action is an async function in [`commands`] returning
//! `Result<T, String>`, where the error string is the alert shown to the
//! user. [`shell`] reads commands from stdin and [`render`] turns state into
//! text screens.

pub mod commands;
pub mod render;
pub mod shell;

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::warn;

use bodyfat_core::api::EstimationService;
use bodyfat_core::config::{ClientConfig, PersistencePolicy};
use bodyfat_core::preferences::{PreferenceStore, Preferences};
use bodyfat_core::subscription::{Offer, SubscriptionGate};
use bodyfat_core::wizard::{ProgressConfig, TrialPolicy, Wizard};

/// Build identifier embedded by build.rs (`YYYY.MM.DD+g<sha>`)
pub const BUILD_ID: &str = match option_env!("BODYFAT_BUILD_ID") {
    Some(id) => id,
    None => "unknown",
};

/// Application state shared by all commands
pub struct AppState {
    /// Active wizard session
    pub wizard: Mutex<Wizard>,
    /// Flags mirrored to the preference store
    pub preferences: Mutex<Preferences>,
    /// Offers from the last paywall load, used by `buy`
    pub offers: Mutex<Vec<Offer>>,
    /// Preference storage
    pub store: PreferenceStore,
    /// Entitlement checks and purchases
    pub gate: Arc<dyn SubscriptionGate>,
    /// Estimation backend
    pub api: Arc<dyn EstimationService>,
    /// Progress animation settings
    pub progress: ProgressConfig,
}

impl AppState {
    /// Build state from loaded preferences.
    ///
    /// A persistent store makes the free trial one-shot per install.
    pub fn new(
        store: PreferenceStore,
        gate: Arc<dyn SubscriptionGate>,
        api: Arc<dyn EstimationService>,
    ) -> Self {
        let preferences = store.load();
        let policy = match store.policy() {
            PersistencePolicy::Persistent => TrialPolicy::PerInstall,
            PersistencePolicy::Ephemeral => TrialPolicy::PerCycle,
        };
        Self {
            wizard: Mutex::new(Wizard::with_trial(policy, preferences.free_trial_used)),
            preferences: Mutex::new(preferences),
            offers: Mutex::new(Vec::new()),
            store,
            gate,
            api,
            progress: ProgressConfig::default(),
        }
    }

    /// Build state for a loaded client configuration
    pub fn from_config(
        config: &ClientConfig,
        gate: Arc<dyn SubscriptionGate>,
        api: Arc<dyn EstimationService>,
    ) -> Self {
        let store = PreferenceStore::new(config.persistence, config.preferences_path.clone());
        Self::new(store, gate, api)
    }

    /// Apply a change to the preferences and save them.
    ///
    /// Save failures are logged; the in-memory flags still change.
    pub async fn update_preferences<F>(&self, change: F)
    where
        F: FnOnce(&mut Preferences),
    {
        let mut prefs = self.preferences.lock().await;
        change(&mut prefs);
        if let Err(e) = self.store.save(&prefs) {
            warn!("Failed to save preferences: {}", e);
        }
    }
}
