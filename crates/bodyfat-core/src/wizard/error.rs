//! Wizard error types

use thiserror::Error;

use crate::api::ApiError;
use crate::validation::ValidationError;

/// Errors from wizard actions
#[derive(Error, Debug)]
pub enum WizardError {
    /// The action does not apply to the current step
    #[error("'{action}' is not available on step {step}")]
    InvalidTransition {
        /// Attempted action
        action: &'static str,
        /// Current step number
        step: u8,
    },

    /// A remote call for this screen is still running
    #[error("Please wait for the current request to finish")]
    Busy,

    /// The first screen has no back target
    #[error("Already on the first step")]
    NoBackTarget,

    /// The data form failed validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The estimation call failed; the wizard is back on the data step
    #[error("{0}")]
    Estimate(#[source] ApiError),

    /// The advice call failed; the wizard is back on the result step
    #[error("Failed to load advice. Please try again.")]
    Advice(#[source] ApiError),

    /// A completion arrived after the wizard moved on
    #[error("Ignoring a late response for step {step}")]
    Stale {
        /// Step the wizard is on now
        step: u8,
    },

    /// Photo index out of range
    #[error("No photo at position {index} ({count} selected)")]
    PhotoIndex {
        /// Requested index (1-based)
        index: usize,
        /// Photos currently selected
        count: usize,
    },
}
