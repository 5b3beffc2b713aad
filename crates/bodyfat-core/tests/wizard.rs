use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use pretty_assertions::assert_eq;

use bodyfat_core::api::{AdviceRequest, ApiError, BodyFatResponse, EstimationService};
use bodyfat_core::measurement::UnitSystem;
use bodyfat_core::models::{AdvicePayload, AdviceSection, BiometricInput, Gender, PhotoRef};
use bodyfat_core::subscription::EntitlementStatus;
use bodyfat_core::wizard::{
    run_advice, run_estimate, AdviceDecision, CalculateDecision, ProgressConfig, ProgressTicker,
    TrialPolicy, Wizard, WizardError, WizardStep,
};

/// Scripted backend that records what it was asked
#[derive(Default)]
struct FakeBackend {
    fail_estimate: bool,
    fail_advice: bool,
    estimate_calls: AtomicUsize,
    advice_calls: AtomicUsize,
    last_photos: Mutex<Vec<PhotoRef>>,
    last_advice: Mutex<Option<AdviceRequest>>,
}

#[async_trait]
impl EstimationService for FakeBackend {
    async fn estimate(
        &self,
        _input: &BiometricInput,
        photos: &[PhotoRef],
    ) -> Result<BodyFatResponse, ApiError> {
        self.estimate_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_photos.lock().unwrap() = photos.to_vec();
        if self.fail_estimate {
            return Err(ApiError::Server {
                status: 503,
                detail: Some("Model is warming up".into()),
            });
        }
        Ok(BodyFatResponse {
            body_fat_percent: 17.4,
            comment: "Healthy range".into(),
            evaluation: None,
        })
    }

    async fn advice(&self, request: &AdviceRequest) -> Result<AdvicePayload, ApiError> {
        self.advice_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_advice.lock().unwrap() = Some(request.clone());
        if self.fail_advice {
            return Err(ApiError::Server {
                status: 500,
                detail: None,
            });
        }
        Ok(AdvicePayload {
            title: "Your plan".into(),
            sections: vec![AdviceSection {
                title: "Nutrition".into(),
                content: "Eat protein".into(),
                macros: None,
            }],
            time_estimate: None,
        })
    }
}

fn ticker() -> ProgressTicker {
    ProgressTicker::start(ProgressConfig::default())
}

/// Wizard on step 2 with a valid metric form
fn filled_wizard() -> Wizard {
    let mut wizard = Wizard::new();
    wizard.add_photos([PhotoRef::new("/photos/front.jpg")]).unwrap();
    wizard.next().unwrap();
    let form = wizard.form_mut().unwrap();
    form.set_gender(Gender::Male);
    form.set_age("34");
    form.measurement.set_height_cm("182");
    form.measurement.set_weight("84");
    form.measurement.set_waist("90");
    wizard
}

fn premium() -> EntitlementStatus {
    EntitlementStatus {
        is_active: true,
        expires_at: None,
        product_id: Some("monthly".into()),
    }
}

#[test]
fn test_calculate_without_entitlement_shows_paywall() {
    let mut wizard = filled_wizard();
    let decision = wizard.calculate().unwrap();
    assert_eq!(decision, CalculateDecision::Paywall);
    assert!(wizard.paywall_visible());
    assert_eq!(wizard.step_number(), 2);
    assert_eq!(wizard.step(), &WizardStep::Data);
}

#[test]
fn test_invalid_form_never_reaches_paywall() {
    let mut wizard = filled_wizard();
    wizard.form_mut().unwrap().set_age("");
    let err = wizard.calculate().unwrap_err();
    assert_eq!(err.to_string(), "Please enter a valid age");
    assert!(!wizard.paywall_visible());
    assert_eq!(wizard.step_number(), 2);
}

#[test]
fn test_entitled_calculate_proceeds() {
    let mut wizard = filled_wizard();
    wizard.set_entitlement(premium());
    match wizard.calculate().unwrap() {
        CalculateDecision::Proceed(pending) => {
            assert_eq!(pending.input.age, 34);
            assert_eq!(pending.input.waist_cm, Some(90.0));
            assert_eq!(pending.photos, vec![PhotoRef::new("/photos/front.jpg")]);
        }
        other => panic!("expected to proceed, got {:?}", other),
    }
    assert_eq!(wizard.step_number(), 3);
    assert!(wizard.step().is_loading());
    assert!(!wizard.paywall_visible());
}

#[tokio::test(start_paused = true)]
async fn test_trial_is_one_shot_per_cycle() {
    let backend = FakeBackend::default();
    let mut wizard = filled_wizard();

    assert_eq!(wizard.calculate().unwrap(), CalculateDecision::Paywall);
    let pending = match wizard.use_free_trial().unwrap() {
        CalculateDecision::Proceed(pending) => pending,
        other => panic!("trial should proceed, got {:?}", other),
    };
    assert!(!wizard.paywall_visible());
    assert_eq!(wizard.step_number(), 3);

    run_estimate(&mut wizard, &backend, pending, ticker())
        .await
        .unwrap();
    assert_eq!(wizard.step_number(), 3);
    assert!(wizard.trial_used());
    let outcome = wizard.step().outcome().unwrap();
    assert_eq!(outcome.result.body_fat_percent, 17.4);
    assert_eq!(outcome.result.evaluation.label(), "Normal");

    // Back to the form and try again without paying
    wizard.back().unwrap();
    wizard.next().unwrap();
    assert_eq!(wizard.calculate().unwrap(), CalculateDecision::Paywall);
    assert_eq!(wizard.use_free_trial().unwrap(), CalculateDecision::Paywall);
    assert!(wizard.paywall_visible());
    assert_eq!(wizard.step_number(), 2);
    assert_eq!(backend.estimate_calls.load(Ordering::SeqCst), 1);

    // Start Over gives the trial back
    wizard.start_over();
    assert!(!wizard.trial_used());
    assert!(!wizard.paywall_visible());
}

#[test]
fn test_per_install_trial_survives_start_over() {
    let mut wizard = Wizard::with_trial(TrialPolicy::PerInstall, true);
    wizard.start_over();
    assert!(wizard.trial_used());

    wizard.next().unwrap();
    let form = wizard.form_mut().unwrap();
    form.set_gender(Gender::Female);
    form.set_age("40");
    form.measurement.set_height_cm("165");
    form.measurement.set_weight("60");
    assert_eq!(wizard.use_free_trial().unwrap(), CalculateDecision::Paywall);
}

#[tokio::test(start_paused = true)]
async fn test_failed_estimate_returns_to_data_with_fields_intact() {
    let backend = FakeBackend {
        fail_estimate: true,
        ..Default::default()
    };
    let mut wizard = filled_wizard();
    wizard.toggle_units(UnitSystem::Imperial).unwrap();
    let form_before = wizard.form().clone();

    let pending = match wizard.use_free_trial().unwrap() {
        CalculateDecision::Proceed(pending) => pending,
        other => panic!("trial should proceed, got {:?}", other),
    };
    let err = run_estimate(&mut wizard, &backend, pending, ticker())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Model is warming up");
    assert_eq!(wizard.step_number(), 2);
    assert_eq!(wizard.form(), &form_before);
    assert_eq!(wizard.form().measurement.system(), UnitSystem::Imperial);
    assert_eq!(wizard.photos().len(), 1);
    // A failed call does not consume the trial
    assert!(!wizard.trial_used());
}

#[tokio::test(start_paused = true)]
async fn test_advice_fetched_once_per_result() {
    let backend = FakeBackend::default();
    let mut wizard = filled_wizard();
    wizard.set_entitlement(premium());
    let pending = match wizard.calculate().unwrap() {
        CalculateDecision::Proceed(pending) => pending,
        other => panic!("expected to proceed, got {:?}", other),
    };
    run_estimate(&mut wizard, &backend, pending, ticker())
        .await
        .unwrap();

    let pending = match wizard.begin_advice().unwrap() {
        AdviceDecision::Fetch(pending) => pending,
        AdviceDecision::Cached => panic!("nothing cached yet"),
    };
    assert_eq!(wizard.step_number(), 4);
    run_advice(&mut wizard, &backend, pending, ticker())
        .await
        .unwrap();
    assert!(matches!(wizard.step(), WizardStep::Advice { .. }));

    let request = backend.last_advice.lock().unwrap().clone().unwrap();
    assert_eq!(request.evaluation, "Normal");
    assert_eq!(request.gender, Gender::Male);
    assert_eq!(request.age, 34);

    wizard.back().unwrap();
    assert_eq!(wizard.step_number(), 3);
    assert_eq!(wizard.begin_advice().unwrap(), AdviceDecision::Cached);
    assert_eq!(wizard.step_number(), 4);
    assert_eq!(backend.advice_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_failed_advice_returns_to_result() {
    let backend = FakeBackend {
        fail_advice: true,
        ..Default::default()
    };
    let mut wizard = filled_wizard();
    wizard.set_entitlement(premium());
    let pending = match wizard.calculate().unwrap() {
        CalculateDecision::Proceed(pending) => pending,
        other => panic!("expected to proceed, got {:?}", other),
    };
    run_estimate(&mut wizard, &backend, pending, ticker())
        .await
        .unwrap();

    let pending = match wizard.begin_advice().unwrap() {
        AdviceDecision::Fetch(pending) => pending,
        AdviceDecision::Cached => panic!("nothing cached yet"),
    };
    let err = run_advice(&mut wizard, &backend, pending, ticker())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Failed to load advice. Please try again.");
    assert!(matches!(
        wizard.step(),
        WizardStep::Result { advice: None, .. }
    ));
}

#[test]
fn test_actions_blocked_while_loading() {
    let mut wizard = filled_wizard();
    wizard.set_entitlement(premium());
    wizard.calculate().unwrap();

    assert!(matches!(wizard.calculate(), Err(WizardError::Busy)));
    assert!(matches!(wizard.back(), Err(WizardError::Busy)));
    assert!(matches!(wizard.next(), Err(WizardError::Busy)));
    assert!(matches!(wizard.form_mut(), Err(WizardError::Busy)));
    assert_eq!(wizard.step_number(), 3);
}

#[test]
fn test_late_response_after_start_over_is_ignored() {
    let mut wizard = filled_wizard();
    wizard.set_entitlement(premium());
    wizard.calculate().unwrap();
    wizard.start_over();

    let late = Ok(BodyFatResponse {
        body_fat_percent: 20.0,
        comment: String::new(),
        evaluation: None,
    });
    assert!(matches!(
        wizard.complete_estimate(late),
        Err(WizardError::Stale { step: 1 })
    ));
    assert_eq!(wizard.step(), &WizardStep::Photos);
}

#[test]
fn test_start_over_resets_everything() {
    let mut wizard = filled_wizard();
    wizard.toggle_units(UnitSystem::Imperial).unwrap();
    wizard.show_paywall();
    wizard.start_over();

    assert_eq!(wizard.step(), &WizardStep::Photos);
    assert!(wizard.photos().is_empty());
    assert_eq!(wizard.form().gender, None);
    assert_eq!(wizard.form().age, "");
    assert_eq!(wizard.form().measurement.system(), UnitSystem::Metric);
    assert!(!wizard.paywall_visible());
}
