//! Step states and the hand-off values between the wizard and remote calls

use crate::api::AdviceRequest;
use crate::models::{AdvicePayload, BiometricInput, EstimationResult, PhotoRef};

/// A completed estimation together with the input that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// Biometrics that were submitted
    pub input: BiometricInput,
    /// Backend result with resolved evaluation
    pub result: EstimationResult,
}

/// Current wizard screen.
///
/// Each variant carries only the data valid on that screen.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum WizardStep {
    /// Step 1: choose photos
    #[default]
    Photos,
    /// Step 2: biometric data entry
    Data,
    /// Step 3 while the estimation call runs
    Calculating {
        /// Submitted biometrics
        input: BiometricInput,
        /// The one-shot trial is paying for this calculation
        via_trial: bool,
    },
    /// Step 3: result shown
    Result {
        /// The estimation
        outcome: Outcome,
        /// Advice already fetched for this result
        advice: Option<AdvicePayload>,
    },
    /// Step 4 while the advice call runs
    FetchingAdvice {
        /// The estimation the advice is for
        outcome: Outcome,
    },
    /// Step 4: advice shown
    Advice {
        /// The estimation
        outcome: Outcome,
        /// Advice for it
        advice: AdvicePayload,
    },
}

impl WizardStep {
    /// 1-based step number shown in the progress header
    pub fn number(&self) -> u8 {
        match self {
            WizardStep::Photos => 1,
            WizardStep::Data => 2,
            WizardStep::Calculating { .. } | WizardStep::Result { .. } => 3,
            WizardStep::FetchingAdvice { .. } | WizardStep::Advice { .. } => 4,
        }
    }

    /// A remote call for this screen is in flight
    pub fn is_loading(&self) -> bool {
        matches!(
            self,
            WizardStep::Calculating { .. } | WizardStep::FetchingAdvice { .. }
        )
    }

    /// The displayed estimation, on steps that have one
    pub fn outcome(&self) -> Option<&Outcome> {
        match self {
            WizardStep::Result { outcome, .. }
            | WizardStep::FetchingAdvice { outcome }
            | WizardStep::Advice { outcome, .. } => Some(outcome),
            _ => None,
        }
    }
}

/// Whether the free trial comes back after "Start Over"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrialPolicy {
    /// One trial per wizard cycle
    #[default]
    PerCycle,
    /// One trial per install
    PerInstall,
}

/// Estimation to run, produced when "Calculate" is allowed through
#[derive(Debug, Clone, PartialEq)]
pub struct PendingEstimate {
    /// Validated metric biometrics
    pub input: BiometricInput,
    /// Photos to upload
    pub photos: Vec<PhotoRef>,
}

/// Advice request to run, produced by "Get Advice"
#[derive(Debug, Clone, PartialEq)]
pub struct PendingAdvice {
    /// Request body
    pub request: AdviceRequest,
}

/// What "Calculate" or "Use free trial" decided
#[derive(Debug, Clone, PartialEq)]
pub enum CalculateDecision {
    /// Now on step 3; run the estimation
    Proceed(PendingEstimate),
    /// The paywall is showing and the step did not change
    Paywall,
}

/// What "Get Advice" decided
#[derive(Debug, Clone, PartialEq)]
pub enum AdviceDecision {
    /// Cached advice is already showing
    Cached,
    /// Now on step 4; run the advice request
    Fetch(PendingAdvice),
}
