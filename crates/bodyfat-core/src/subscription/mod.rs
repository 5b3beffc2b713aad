//! Subscription gate
//!
//! A single [`SubscriptionGate`] is built once at startup by [`create_gate`]:
//! [`LiveGate`] over a native [`PurchaseSdk`], or [`SandboxGate`] when the
//! runtime has no purchase capability. Screens receive the gate as an
//! `Arc<dyn SubscriptionGate>`.

mod error;
mod live;
mod sandbox;
mod types;

pub use error::{SdkError, SubscriptionError};
pub use live::LiveGate;
pub use sandbox::SandboxGate;
pub use types::{
    CustomerInfo, EntitlementInfo, EntitlementStatus, Offer, OfferProduct, PackageType,
    PurchaseOutcome,
};

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::RuntimeEnvironment;

/// Entitlement id that unlocks premium
pub const ENTITLEMENT_KEY: &str = "premium";

/// Surface of the native purchase SDK
#[async_trait]
pub trait PurchaseSdk: Send + Sync {
    /// Configure with the platform api key
    async fn configure(&self, api_key: &str) -> Result<(), SdkError>;

    /// Identify as a known user
    async fn log_in(&self, user_id: &str) -> Result<CustomerInfo, SdkError>;

    /// Packages of the current offering
    async fn get_offerings(&self) -> Result<Vec<Offer>, SdkError>;

    /// Run the store purchase flow
    async fn purchase_package(&self, offer: &Offer) -> Result<CustomerInfo, SdkError>;

    /// Restore previous purchases
    async fn restore_purchases(&self) -> Result<CustomerInfo, SdkError>;

    /// Current customer state
    async fn get_customer_info(&self) -> Result<CustomerInfo, SdkError>;
}

/// Entitlement checks and purchases
#[async_trait]
pub trait SubscriptionGate: Send + Sync {
    /// Configure the SDK and log in. Idempotent.
    async fn initialize(&self, user_id: Option<&str>) -> Result<(), SubscriptionError>;

    /// Purchasable offers; empty when they cannot be loaded
    async fn list_offers(&self) -> Vec<Offer>;

    /// Buy an offer.
    ///
    /// Only an active premium entitlement counts as [`PurchaseOutcome::Purchased`].
    /// A user cancel is [`PurchaseOutcome::Cancelled`]; other SDK failures
    /// are errors.
    async fn purchase(&self, offer: &Offer) -> Result<PurchaseOutcome, SubscriptionError>;

    /// Restore purchases; true when premium is active afterwards
    async fn restore(&self) -> bool;

    /// Current entitlement; inactive on any failure
    async fn check_status(&self) -> EntitlementStatus;

    /// SDK user id, if any
    async fn current_user_id(&self) -> Option<String>;

    /// Runtime this gate serves
    fn environment(&self) -> RuntimeEnvironment;
}

/// Select the gate for `runtime`.
///
/// The native runtime requires both an SDK and an api key.
pub fn create_gate(
    runtime: RuntimeEnvironment,
    api_key: Option<&str>,
    sdk: Option<Box<dyn PurchaseSdk>>,
) -> Result<Arc<dyn SubscriptionGate>, SubscriptionError> {
    match runtime {
        RuntimeEnvironment::Sandboxed => Ok(Arc::new(SandboxGate::new())),
        RuntimeEnvironment::Native => {
            let sdk = sdk.ok_or(SubscriptionError::SdkUnavailable(runtime))?;
            let api_key = api_key.ok_or(SubscriptionError::MissingApiKey)?;
            Ok(Arc::new(LiveGate::new(sdk, api_key)))
        }
    }
}
