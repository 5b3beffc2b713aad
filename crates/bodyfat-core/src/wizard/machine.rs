//! The wizard state machine
//!
//! ```text
//! Photos(1) -> Data(2) -> Calculating(3) -> Result(3) -> FetchingAdvice(4) -> Advice(4)
//!                 ^             |                ^               |
//!                 +-- failure --+                +--- failure ---+
//! ```
//!
//! The paywall is an overlay flag independent of the step. "Calculate" on
//! the data step opens it unless premium is active; only the free-trial
//! action lets one calculation through without an entitlement.

use tracing::{debug, info};

use super::error::WizardError;
use super::state::{
    AdviceDecision, CalculateDecision, Outcome, PendingAdvice, PendingEstimate, TrialPolicy,
    WizardStep,
};
use crate::api::{AdviceRequest, ApiError, BodyFatResponse};
use crate::measurement::{DataForm, UnitSystem};
use crate::models::{AdvicePayload, BiometricInput, PhotoRef};
use crate::subscription::EntitlementStatus;

/// Wizard session state
#[derive(Debug, Clone, Default)]
pub struct Wizard {
    step: WizardStep,
    form: DataForm,
    photos: Vec<PhotoRef>,
    paywall_visible: bool,
    trial_used: bool,
    trial_policy: TrialPolicy,
    entitlement: EntitlementStatus,
}

impl Wizard {
    /// Fresh wizard on the photo step with a per-cycle trial
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh wizard with a trial policy and the persisted trial flag
    pub fn with_trial(policy: TrialPolicy, trial_used: bool) -> Self {
        Self {
            trial_policy: policy,
            trial_used,
            ..Self::default()
        }
    }

    /// Current step
    pub fn step(&self) -> &WizardStep {
        &self.step
    }

    /// Current step number (1..=4)
    pub fn step_number(&self) -> u8 {
        self.step.number()
    }

    /// Data form
    pub fn form(&self) -> &DataForm {
        &self.form
    }

    /// Selected photos in upload order
    pub fn photos(&self) -> &[PhotoRef] {
        &self.photos
    }

    /// The paywall overlay is showing
    pub fn paywall_visible(&self) -> bool {
        self.paywall_visible
    }

    /// The free trial was consumed
    pub fn trial_used(&self) -> bool {
        self.trial_used
    }

    /// Trial policy in effect
    pub fn trial_policy(&self) -> TrialPolicy {
        self.trial_policy
    }

    /// Last known entitlement
    pub fn entitlement(&self) -> &EntitlementStatus {
        &self.entitlement
    }

    fn invalid(&self, action: &'static str) -> WizardError {
        if self.step.is_loading() {
            WizardError::Busy
        } else {
            WizardError::InvalidTransition {
                action,
                step: self.step.number(),
            }
        }
    }

    fn require_photos(&self, action: &'static str) -> Result<(), WizardError> {
        match self.step {
            WizardStep::Photos => Ok(()),
            _ => Err(self.invalid(action)),
        }
    }

    fn require_data(&self, action: &'static str) -> Result<(), WizardError> {
        match self.step {
            WizardStep::Data => Ok(()),
            _ => Err(self.invalid(action)),
        }
    }

    /// Photos -> Data
    pub fn next(&mut self) -> Result<(), WizardError> {
        self.require_photos("next")?;
        self.step = WizardStep::Data;
        Ok(())
    }

    /// Step back: Data and Result go to Photos, Advice returns to Result
    pub fn back(&mut self) -> Result<(), WizardError> {
        match std::mem::take(&mut self.step) {
            WizardStep::Photos => Err(WizardError::NoBackTarget),
            WizardStep::Data | WizardStep::Result { .. } => {
                self.step = WizardStep::Photos;
                Ok(())
            }
            WizardStep::Advice { outcome, advice } => {
                self.step = WizardStep::Result {
                    outcome,
                    advice: Some(advice),
                };
                Ok(())
            }
            loading => {
                self.step = loading;
                Err(WizardError::Busy)
            }
        }
    }

    /// Append photos (photo step only)
    pub fn add_photos<I>(&mut self, photos: I) -> Result<usize, WizardError>
    where
        I: IntoIterator<Item = PhotoRef>,
    {
        self.require_photos("add photo")?;
        let before = self.photos.len();
        self.photos.extend(photos);
        Ok(self.photos.len() - before)
    }

    /// Remove the photo at a 1-based position (photo step only)
    pub fn remove_photo(&mut self, index: usize) -> Result<PhotoRef, WizardError> {
        self.require_photos("remove photo")?;
        if index == 0 || index > self.photos.len() {
            return Err(WizardError::PhotoIndex {
                index,
                count: self.photos.len(),
            });
        }
        Ok(self.photos.remove(index - 1))
    }

    /// Remove every photo (photo step only)
    pub fn clear_photos(&mut self) -> Result<(), WizardError> {
        self.require_photos("remove all photos")?;
        self.photos.clear();
        Ok(())
    }

    /// Edit the data form (data step only)
    pub fn form_mut(&mut self) -> Result<&mut DataForm, WizardError> {
        self.require_data("edit")?;
        Ok(&mut self.form)
    }

    /// Switch units, re-populating the fields (data step only)
    pub fn toggle_units(&mut self, system: UnitSystem) -> Result<(), WizardError> {
        self.require_data("switch units")?;
        self.form.measurement.toggle_system(system);
        Ok(())
    }

    /// "Calculate" on the data step.
    ///
    /// Validation failures leave everything as it is. Without an active
    /// entitlement the paywall opens and the step stays on 2.
    pub fn calculate(&mut self) -> Result<CalculateDecision, WizardError> {
        self.require_data("calculate")?;
        let input = BiometricInput::from_form(&self.form)?;

        if !self.entitlement.is_active {
            debug!("Calculate gated: no active entitlement");
            self.paywall_visible = true;
            return Ok(CalculateDecision::Paywall);
        }

        Ok(self.begin_estimate(input, false))
    }

    /// "Use free trial" from the paywall.
    ///
    /// Lets exactly one calculation through per trial. When the trial is
    /// already spent the paywall stays up and nothing else changes.
    pub fn use_free_trial(&mut self) -> Result<CalculateDecision, WizardError> {
        self.require_data("use free trial")?;
        if self.trial_used {
            self.paywall_visible = true;
            return Ok(CalculateDecision::Paywall);
        }

        let input = BiometricInput::from_form(&self.form)?;
        self.paywall_visible = false;
        Ok(self.begin_estimate(input, true))
    }

    fn begin_estimate(&mut self, input: BiometricInput, via_trial: bool) -> CalculateDecision {
        let pending = PendingEstimate {
            input: input.clone(),
            photos: self.photos.clone(),
        };
        self.step = WizardStep::Calculating { input, via_trial };
        CalculateDecision::Proceed(pending)
    }

    /// Apply the estimation response.
    ///
    /// On failure the wizard returns to the data step with every field as
    /// entered, and the error is handed back for display.
    pub fn complete_estimate(
        &mut self,
        response: Result<BodyFatResponse, ApiError>,
    ) -> Result<(), WizardError> {
        let (input, via_trial) = match std::mem::take(&mut self.step) {
            WizardStep::Calculating { input, via_trial } => (input, via_trial),
            other => {
                let step = other.number();
                self.step = other;
                return Err(WizardError::Stale { step });
            }
        };

        match response {
            Ok(response) => {
                let result = response.into_result(input.gender);
                info!(
                    "Result: {:.1}% ({})",
                    result.body_fat_percent, result.evaluation
                );
                if via_trial {
                    self.trial_used = true;
                }
                self.step = WizardStep::Result {
                    outcome: Outcome { input, result },
                    advice: None,
                };
                Ok(())
            }
            Err(e) => {
                self.step = WizardStep::Data;
                Err(WizardError::Estimate(e))
            }
        }
    }

    /// "Get Advice" on the result step. Advice already fetched for this
    /// result is shown again without a new request.
    pub fn begin_advice(&mut self) -> Result<AdviceDecision, WizardError> {
        match std::mem::take(&mut self.step) {
            WizardStep::Result {
                outcome,
                advice: Some(advice),
            } => {
                self.step = WizardStep::Advice { outcome, advice };
                Ok(AdviceDecision::Cached)
            }
            WizardStep::Result {
                outcome,
                advice: None,
            } => {
                let request = AdviceRequest::new(&outcome.input, &outcome.result);
                self.step = WizardStep::FetchingAdvice { outcome };
                Ok(AdviceDecision::Fetch(PendingAdvice { request }))
            }
            other => {
                self.step = other;
                Err(self.invalid("get advice"))
            }
        }
    }

    /// Apply the advice response; on failure return to the result step.
    pub fn complete_advice(
        &mut self,
        response: Result<AdvicePayload, ApiError>,
    ) -> Result<(), WizardError> {
        let outcome = match std::mem::take(&mut self.step) {
            WizardStep::FetchingAdvice { outcome } => outcome,
            other => {
                let step = other.number();
                self.step = other;
                return Err(WizardError::Stale { step });
            }
        };

        match response {
            Ok(advice) => {
                self.step = WizardStep::Advice { outcome, advice };
                Ok(())
            }
            Err(e) => {
                self.step = WizardStep::Result {
                    outcome,
                    advice: None,
                };
                Err(WizardError::Advice(e))
            }
        }
    }

    /// Open the paywall ("Upgrade"), from any step
    pub fn show_paywall(&mut self) {
        self.paywall_visible = true;
    }

    /// Close the paywall. Callers re-query the entitlement afterwards.
    pub fn close_paywall(&mut self) {
        self.paywall_visible = false;
    }

    /// Record a freshly queried entitlement
    pub fn set_entitlement(&mut self, status: EntitlementStatus) {
        self.entitlement = status;
    }

    /// Back to an empty photo step in metric units.
    ///
    /// Under [`TrialPolicy::PerCycle`] the free trial becomes available again.
    pub fn start_over(&mut self) {
        self.step = WizardStep::Photos;
        self.form = DataForm::new();
        self.photos.clear();
        self.paywall_visible = false;
        if self.trial_policy == TrialPolicy::PerCycle {
            self.trial_used = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_editing_only_on_first_step() {
        let mut wizard = Wizard::new();
        assert_eq!(wizard.add_photos([PhotoRef::new("a.jpg"), PhotoRef::new("b.jpg")]).unwrap(), 2);
        assert!(matches!(
            wizard.remove_photo(3),
            Err(WizardError::PhotoIndex { index: 3, count: 2 })
        ));
        assert_eq!(wizard.remove_photo(1).unwrap(), PhotoRef::new("a.jpg"));

        wizard.next().unwrap();
        assert!(matches!(
            wizard.clear_photos(),
            Err(WizardError::InvalidTransition { step: 2, .. })
        ));
        assert_eq!(wizard.photos().len(), 1);
    }

    #[test]
    fn test_back_targets() {
        let mut wizard = Wizard::new();
        assert!(matches!(wizard.back(), Err(WizardError::NoBackTarget)));
        wizard.next().unwrap();
        wizard.back().unwrap();
        assert_eq!(wizard.step(), &WizardStep::Photos);
    }

    #[test]
    fn test_form_locked_outside_data_step() {
        let mut wizard = Wizard::new();
        assert!(wizard.form_mut().is_err());
        assert!(wizard.toggle_units(UnitSystem::Imperial).is_err());
        assert!(matches!(
            wizard.calculate(),
            Err(WizardError::InvalidTransition { action: "calculate", step: 1 })
        ));
    }

    #[test]
    fn test_upgrade_opens_paywall_anywhere() {
        let mut wizard = Wizard::new();
        wizard.show_paywall();
        assert!(wizard.paywall_visible());
        assert_eq!(wizard.step_number(), 1);
        wizard.close_paywall();
        assert!(!wizard.paywall_visible());
    }
}
