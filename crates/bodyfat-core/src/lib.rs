//! # BodyFatAI Core Library
//!
//! Core functionality for the BodyFatAI body fat estimation client.
//!
//! This library provides:
//! - Metric/imperial unit conversion for height, weight and waist
//! - Data-entry form handling and input validation
//! - Body fat evaluation bands
//! - The four-step wizard state machine (photos, data, result, advice)
//! - HTTP client for the estimation and advice backend
//! - Subscription gate over a native purchase SDK, with a sandboxed stand-in
//! - Client configuration and preference persistence
//!
//! ## Example
//!
//! ```rust,ignore
//! use bodyfat_core::prelude::*;
//!
//! let config = ClientConfig::from_env()?;
//! let api = ApiClient::new(&config)?;
//! let mut wizard = Wizard::new();
//!
//! wizard.next()?;
//! wizard.form_mut()?.set_age("31");
//! // ...
//! if let CalculateDecision::Proceed(pending) = wizard.use_free_trial()? {
//!     run_estimate(&mut wizard, &api, pending, ProgressTicker::start(Default::default())).await?;
//! }
//! ```

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod api;
pub mod config;
pub mod evaluation;
pub mod measurement;
pub mod models;
pub mod onboarding;
pub mod preferences;
pub mod subscription;
pub mod unit_conversion;
pub mod validation;
pub mod wizard;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::api::{ApiClient, ApiError, EstimationService};
    pub use crate::config::{ClientConfig, PersistencePolicy, RuntimeEnvironment};
    pub use crate::evaluation::{evaluate, Evaluation, EvaluationBand};
    pub use crate::measurement::{DataForm, Measurement, MetricMeasurement, UnitSystem};
    pub use crate::models::{AdvicePayload, BiometricInput, EstimationResult, Gender, PhotoRef};
    pub use crate::preferences::{PreferenceStore, Preferences};
    pub use crate::subscription::{
        create_gate, EntitlementStatus, Offer, PurchaseOutcome, SubscriptionGate,
    };
    pub use crate::validation::{validate, ValidationError};
    pub use crate::wizard::{
        run_advice, run_estimate, CalculateDecision, ProgressConfig, ProgressTicker, TrialPolicy,
        Wizard, WizardError, WizardStep,
    };
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
