//! Subscription error types

use thiserror::Error;

use crate::config::RuntimeEnvironment;

/// Failure reported by the native purchase SDK
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SdkError {
    /// The user dismissed the store sheet
    #[error("Purchase cancelled by user")]
    UserCancelled,

    /// Any other store or network failure
    #[error("{0}")]
    Failure(String),
}

/// Subscription gate errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The SDK reported a failure
    #[error("Subscription error: {0}")]
    Sdk(String),

    /// The configured runtime needs an SDK that was not provided
    #[error("No purchase SDK available for the {0} runtime")]
    SdkUnavailable(RuntimeEnvironment),

    /// An operation needs `initialize` first
    #[error("Subscription gate not initialized")]
    NotInitialized,

    /// The native runtime was selected without an api key
    #[error("Missing purchase SDK api key")]
    MissingApiKey,
}

impl From<SdkError> for SubscriptionError {
    fn from(err: SdkError) -> Self {
        SubscriptionError::Sdk(err.to_string())
    }
}
