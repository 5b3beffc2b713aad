//! One async function per user action.
//!
//! Errors are returned as the alert text shown to the user. The wizard lock
//! is released while remote calls are in flight.

use tokio::sync::watch;
use tracing::info;

use bodyfat_core::measurement::UnitSystem;
use bodyfat_core::models::{Gender, PhotoRef};
use bodyfat_core::subscription::{EntitlementStatus, Offer, PurchaseOutcome};
use bodyfat_core::wizard::{
    fetch_advice, fetch_estimate, AdviceDecision, CalculateDecision, ProgressTicker,
};

use crate::AppState;

/// Receives the progress channel of a remote call as it starts
pub type ProgressObserver<'a> = &'a dyn Fn(watch::Receiver<f64>);

/// What a calculate or trial action ended with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalculateOutcome {
    /// The paywall is showing; nothing was calculated
    Paywall,
    /// A result is showing
    Completed,
}

/// Shown when a purchase is attempted where purchases cannot complete
pub const PURCHASES_UNAVAILABLE: &str =
    "Purchases are not available in the sandboxed runtime. Run with BODYFAT_RUNTIME=native to buy.";

/// Photos -> Data
pub async fn next_step(state: &AppState) -> Result<(), String> {
    state.wizard.lock().await.next().map_err(|e| e.to_string())
}

/// Step back
pub async fn back(state: &AppState) -> Result<(), String> {
    state.wizard.lock().await.back().map_err(|e| e.to_string())
}

/// Append photos by path
pub async fn add_photos(state: &AppState, paths: Vec<String>) -> Result<usize, String> {
    if paths.is_empty() {
        return Err("Give at least one photo path".to_string());
    }
    state
        .wizard
        .lock()
        .await
        .add_photos(paths.into_iter().map(PhotoRef::new))
        .map_err(|e| e.to_string())
}

/// Remove a photo by 1-based position
pub async fn remove_photo(state: &AppState, index: usize) -> Result<PhotoRef, String> {
    state
        .wizard
        .lock()
        .await
        .remove_photo(index)
        .map_err(|e| e.to_string())
}

/// Remove every photo
pub async fn clear_photos(state: &AppState) -> Result<(), String> {
    state.wizard.lock().await.clear_photos().map_err(|e| e.to_string())
}

/// Select gender
pub async fn set_gender(state: &AppState, gender: Gender) -> Result<(), String> {
    let mut wizard = state.wizard.lock().await;
    wizard.form_mut().map_err(|e| e.to_string())?.set_gender(gender);
    Ok(())
}

/// Set age text
pub async fn set_age(state: &AppState, age: String) -> Result<(), String> {
    let mut wizard = state.wizard.lock().await;
    wizard.form_mut().map_err(|e| e.to_string())?.set_age(age);
    Ok(())
}

/// Set metric height
pub async fn set_height_cm(state: &AppState, cm: String) -> Result<(), String> {
    let mut wizard = state.wizard.lock().await;
    let form = wizard.form_mut().map_err(|e| e.to_string())?;
    if form.measurement.system() != UnitSystem::Metric {
        return Err("Height is entered in feet and inches; use 'height <ft> <in>'".to_string());
    }
    form.measurement.set_height_cm(cm);
    Ok(())
}

/// Set imperial height
pub async fn set_height_feet_inches(
    state: &AppState,
    feet: String,
    inches: String,
) -> Result<(), String> {
    let mut wizard = state.wizard.lock().await;
    let form = wizard.form_mut().map_err(|e| e.to_string())?;
    if form.measurement.system() != UnitSystem::Imperial {
        return Err("Height is entered in cm; use 'height <cm>'".to_string());
    }
    form.measurement.set_height_feet_inches(feet, inches);
    Ok(())
}

/// Set weight in the active unit
pub async fn set_weight(state: &AppState, weight: String) -> Result<(), String> {
    let mut wizard = state.wizard.lock().await;
    wizard
        .form_mut()
        .map_err(|e| e.to_string())?
        .measurement
        .set_weight(weight);
    Ok(())
}

/// Set or clear the waist in the active unit
pub async fn set_waist(state: &AppState, waist: Option<String>) -> Result<(), String> {
    let mut wizard = state.wizard.lock().await;
    wizard
        .form_mut()
        .map_err(|e| e.to_string())?
        .measurement
        .set_waist(waist.unwrap_or_default());
    Ok(())
}

/// Switch units
pub async fn set_units(state: &AppState, system: UnitSystem) -> Result<(), String> {
    state
        .wizard
        .lock()
        .await
        .toggle_units(system)
        .map_err(|e| e.to_string())
}

/// "Calculate"
pub async fn calculate(
    state: &AppState,
    on_progress: ProgressObserver<'_>,
) -> Result<CalculateOutcome, String> {
    let decision = state
        .wizard
        .lock()
        .await
        .calculate()
        .map_err(|e| e.to_string())?;
    run_calculation(state, decision, on_progress).await
}

/// "Try free" on the paywall
pub async fn use_free_trial(
    state: &AppState,
    on_progress: ProgressObserver<'_>,
) -> Result<CalculateOutcome, String> {
    let decision = state
        .wizard
        .lock()
        .await
        .use_free_trial()
        .map_err(|e| e.to_string())?;
    run_calculation(state, decision, on_progress).await
}

async fn run_calculation(
    state: &AppState,
    decision: CalculateDecision,
    on_progress: ProgressObserver<'_>,
) -> Result<CalculateOutcome, String> {
    let pending = match decision {
        CalculateDecision::Paywall => {
            load_offers(state).await;
            return Ok(CalculateOutcome::Paywall);
        }
        CalculateDecision::Proceed(pending) => pending,
    };

    let ticker = ProgressTicker::start(state.progress);
    on_progress(ticker.subscribe());
    let response = fetch_estimate(state.api.as_ref(), &pending, ticker).await;

    let trial_consumed = {
        let mut wizard = state.wizard.lock().await;
        let before = wizard.trial_used();
        wizard.complete_estimate(response).map_err(|e| e.to_string())?;
        !before && wizard.trial_used()
    };
    if trial_consumed {
        state.update_preferences(|p| p.free_trial_used = true).await;
    }
    Ok(CalculateOutcome::Completed)
}

/// "Get Advice"
pub async fn get_advice(state: &AppState, on_progress: ProgressObserver<'_>) -> Result<(), String> {
    let decision = state
        .wizard
        .lock()
        .await
        .begin_advice()
        .map_err(|e| e.to_string())?;
    let pending = match decision {
        AdviceDecision::Cached => return Ok(()),
        AdviceDecision::Fetch(pending) => pending,
    };

    let ticker = ProgressTicker::start(state.progress);
    on_progress(ticker.subscribe());
    let response = fetch_advice(state.api.as_ref(), &pending, ticker).await;

    state
        .wizard
        .lock()
        .await
        .complete_advice(response)
        .map_err(|e| e.to_string())
}

async fn load_offers(state: &AppState) -> Vec<Offer> {
    let offers = state.gate.list_offers().await;
    *state.offers.lock().await = offers.clone();
    offers
}

/// Re-query the entitlement and record it in the wizard
pub async fn refresh_status(state: &AppState) -> Result<EntitlementStatus, String> {
    let status = state.gate.check_status().await;
    state.wizard.lock().await.set_entitlement(status.clone());
    Ok(status)
}

/// "Upgrade": open the paywall from any step
pub async fn open_paywall(state: &AppState) -> Result<Vec<Offer>, String> {
    state.wizard.lock().await.show_paywall();
    Ok(load_offers(state).await)
}

/// Close the paywall and re-query the entitlement
pub async fn close_paywall(state: &AppState) -> Result<EntitlementStatus, String> {
    state.wizard.lock().await.close_paywall();
    refresh_status(state).await
}

/// List purchasable offers
pub async fn list_offers(state: &AppState) -> Result<Vec<Offer>, String> {
    Ok(load_offers(state).await)
}

/// Buy an offer by identifier.
///
/// Returns the message to show; a user cancel shows nothing.
pub async fn purchase(state: &AppState, offer_id: &str) -> Result<Option<String>, String> {
    let cached = state
        .offers
        .lock()
        .await
        .iter()
        .find(|o| o.identifier == offer_id)
        .cloned();
    let offer = match cached {
        Some(offer) => offer,
        None => load_offers(state)
            .await
            .into_iter()
            .find(|o| o.identifier == offer_id)
            .ok_or_else(|| format!("No offer named '{}'", offer_id))?,
    };

    let outcome = state.gate.purchase(&offer).await.map_err(|e| e.to_string())?;
    match outcome {
        PurchaseOutcome::Purchased => {
            info!("Premium activated via {}", offer.identifier);
            close_paywall(state).await?;
            Ok(Some("Subscription activated!".to_string()))
        }
        PurchaseOutcome::NotEntitled => Ok(Some(
            "The purchase went through but premium is not active yet. Try 'restore'.".to_string(),
        )),
        PurchaseOutcome::Cancelled => Ok(None),
        PurchaseOutcome::Unavailable => Ok(Some(PURCHASES_UNAVAILABLE.to_string())),
    }
}

/// Restore purchases
pub async fn restore(state: &AppState) -> Result<String, String> {
    if state.gate.restore().await {
        close_paywall(state).await?;
        Ok("Purchases restored!".to_string())
    } else {
        Ok("No active subscriptions found to restore".to_string())
    }
}

/// "Start Over"
pub async fn start_over(state: &AppState) -> Result<(), String> {
    let mut wizard = state.wizard.lock().await;
    wizard.start_over();
    let trial_used = wizard.trial_used();
    drop(wizard);
    state
        .update_preferences(|p| p.free_trial_used = trial_used)
        .await;
    Ok(())
}

/// Mark onboarding as seen
pub async fn complete_onboarding(state: &AppState) -> Result<(), String> {
    state
        .update_preferences(|p| p.onboarding_completed = true)
        .await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use bodyfat_core::api::{AdviceRequest, ApiError, BodyFatResponse, EstimationService};
    use bodyfat_core::config::PersistencePolicy;
    use bodyfat_core::models::{AdvicePayload, BiometricInput};
    use bodyfat_core::preferences::PreferenceStore;
    use bodyfat_core::subscription::{SandboxGate, SubscriptionError, SubscriptionGate};
    use bodyfat_core::config::RuntimeEnvironment;
    use bodyfat_core::wizard::WizardStep;

    struct FixedBackend {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl EstimationService for FixedBackend {
        async fn estimate(
            &self,
            _input: &BiometricInput,
            _photos: &[PhotoRef],
        ) -> Result<BodyFatResponse, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(BodyFatResponse {
                body_fat_percent: 21.3,
                comment: "Slightly above average".into(),
                evaluation: Some("Above Average".into()),
            })
        }

        async fn advice(&self, _request: &AdviceRequest) -> Result<AdvicePayload, ApiError> {
            Ok(AdvicePayload {
                title: "Plan".into(),
                sections: Vec::new(),
                time_estimate: None,
            })
        }
    }

    /// Gate that always reports premium
    struct PremiumGate;

    #[async_trait]
    impl SubscriptionGate for PremiumGate {
        async fn initialize(&self, _user_id: Option<&str>) -> Result<(), SubscriptionError> {
            Ok(())
        }
        async fn list_offers(&self) -> Vec<Offer> {
            SandboxGate::canned_offers()
        }
        async fn purchase(&self, _offer: &Offer) -> Result<PurchaseOutcome, SubscriptionError> {
            Ok(PurchaseOutcome::Purchased)
        }
        async fn restore(&self) -> bool {
            true
        }
        async fn check_status(&self) -> EntitlementStatus {
            EntitlementStatus {
                is_active: true,
                expires_at: None,
                product_id: Some("monthly".into()),
            }
        }
        async fn current_user_id(&self) -> Option<String> {
            Some("user-1".into())
        }
        fn environment(&self) -> RuntimeEnvironment {
            RuntimeEnvironment::Native
        }
    }

    fn state_with(gate: Arc<dyn SubscriptionGate>, store: PreferenceStore) -> AppState {
        let api = Arc::new(FixedBackend {
            calls: AtomicUsize::new(0),
        });
        AppState::new(store, gate, api)
    }

    fn ephemeral() -> PreferenceStore {
        PreferenceStore::new(PersistencePolicy::Ephemeral, "unused.json")
    }

    async fn fill_form(state: &AppState) {
        next_step(state).await.unwrap();
        set_gender(state, Gender::Female).await.unwrap();
        set_age(state, "29".into()).await.unwrap();
        set_height_cm(state, "168".into()).await.unwrap();
        set_weight(state, "61".into()).await.unwrap();
    }

    fn ignore_progress(_: watch::Receiver<f64>) {}

    #[tokio::test(start_paused = true)]
    async fn test_sandbox_calculate_then_trial() {
        let state = state_with(Arc::new(SandboxGate::new()), ephemeral());
        fill_form(&state).await;

        assert_eq!(
            calculate(&state, &ignore_progress).await.unwrap(),
            CalculateOutcome::Paywall
        );
        assert_eq!(state.offers.lock().await.len(), 2);
        assert!(state.wizard.lock().await.paywall_visible());

        assert_eq!(
            use_free_trial(&state, &ignore_progress).await.unwrap(),
            CalculateOutcome::Completed
        );
        let wizard = state.wizard.lock().await;
        assert_eq!(wizard.step_number(), 3);
        assert!(wizard.trial_used());
    }

    #[tokio::test(start_paused = true)]
    async fn test_premium_skips_paywall_after_status_refresh() {
        let state = state_with(Arc::new(PremiumGate), ephemeral());
        refresh_status(&state).await.unwrap();
        fill_form(&state).await;

        assert_eq!(
            calculate(&state, &ignore_progress).await.unwrap(),
            CalculateOutcome::Completed
        );
        get_advice(&state, &ignore_progress).await.unwrap();
        assert!(matches!(
            state.wizard.lock().await.step(),
            WizardStep::Advice { .. }
        ));
    }

    #[tokio::test]
    async fn test_sandbox_purchase_is_unavailable() {
        let state = state_with(Arc::new(SandboxGate::new()), ephemeral());
        open_paywall(&state).await.unwrap();
        let message = purchase(&state, "$rc_annual").await.unwrap();
        assert_eq!(message.as_deref(), Some(PURCHASES_UNAVAILABLE));
        assert!(purchase(&state, "$rc_weekly").await.is_err());
        assert_eq!(
            restore(&state).await.unwrap(),
            "No active subscriptions found to restore"
        );
    }

    #[tokio::test]
    async fn test_successful_purchase_closes_paywall() {
        let state = state_with(Arc::new(PremiumGate), ephemeral());
        open_paywall(&state).await.unwrap();
        let message = purchase(&state, "$rc_monthly").await.unwrap();
        assert_eq!(message.as_deref(), Some("Subscription activated!"));
        let wizard = state.wizard.lock().await;
        assert!(!wizard.paywall_visible());
        assert!(wizard.entitlement().is_active);
    }

    #[tokio::test]
    async fn test_height_must_match_units() {
        let state = state_with(Arc::new(SandboxGate::new()), ephemeral());
        next_step(&state).await.unwrap();
        assert!(set_height_feet_inches(&state, "5".into(), "9".into())
            .await
            .is_err());
        set_units(&state, UnitSystem::Imperial).await.unwrap();
        assert!(set_height_cm(&state, "175".into()).await.is_err());
        set_height_feet_inches(&state, "5".into(), "9".into())
            .await
            .unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_persistent_trial_saved_and_kept_after_start_over() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        let store = PreferenceStore::new(PersistencePolicy::Persistent, &path);
        let state = state_with(Arc::new(SandboxGate::new()), store.clone());
        fill_form(&state).await;

        use_free_trial(&state, &ignore_progress).await.unwrap();
        assert!(store.load().free_trial_used);

        start_over(&state).await.unwrap();
        assert!(state.wizard.lock().await.trial_used());
        assert!(store.load().free_trial_used);

        // A new session starts with the trial spent
        let restarted = state_with(Arc::new(SandboxGate::new()), store);
        assert!(restarted.wizard.lock().await.trial_used());
    }
}
