//! Four-step estimation wizard
//!
//! - [`Wizard`]: step transitions, photo list, data form, paywall overlay
//!   and the one-shot free trial
//! - [`ProgressTicker`]: cosmetic progress for remote calls
//! - [`run_estimate`] / [`run_advice`]: drive a remote call and apply it

mod error;
mod flow;
mod machine;
mod progress;
mod state;

pub use error::WizardError;
pub use flow::{fetch_advice, fetch_estimate, run_advice, run_estimate};
pub use machine::Wizard;
pub use progress::{advance, ProgressConfig, ProgressTicker};
pub use state::{
    AdviceDecision, CalculateDecision, Outcome, PendingAdvice, PendingEstimate, TrialPolicy,
    WizardStep,
};
