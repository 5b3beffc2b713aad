//! Gate backed by the native purchase SDK

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::types::{EntitlementStatus, Offer, PurchaseOutcome};
use super::{PurchaseSdk, SdkError, SubscriptionError, SubscriptionGate};
use crate::config::RuntimeEnvironment;

/// Delegates every capability to a [`PurchaseSdk`]
pub struct LiveGate {
    sdk: Box<dyn PurchaseSdk>,
    api_key: String,
    initialized: Mutex<bool>,
}

impl LiveGate {
    /// Wrap an SDK; nothing is called until [`SubscriptionGate::initialize`]
    pub fn new(sdk: Box<dyn PurchaseSdk>, api_key: impl Into<String>) -> Self {
        Self {
            sdk,
            api_key: api_key.into(),
            initialized: Mutex::new(false),
        }
    }

    async fn ensure_initialized(&self) -> Result<(), SubscriptionError> {
        if *self.initialized.lock().await {
            Ok(())
        } else {
            Err(SubscriptionError::NotInitialized)
        }
    }
}

#[async_trait]
impl SubscriptionGate for LiveGate {
    async fn initialize(&self, user_id: Option<&str>) -> Result<(), SubscriptionError> {
        // Held across configure/log_in so concurrent callers configure once
        let mut initialized = self.initialized.lock().await;
        if *initialized {
            return Ok(());
        }

        self.sdk.configure(&self.api_key).await?;
        if let Some(user_id) = user_id {
            self.sdk.log_in(user_id).await?;
        }

        *initialized = true;
        info!("Purchase SDK configured");
        Ok(())
    }

    async fn list_offers(&self) -> Vec<Offer> {
        if self.ensure_initialized().await.is_err() {
            warn!("Offers requested before the purchase SDK was initialized");
            return Vec::new();
        }
        match self.sdk.get_offerings().await {
            Ok(offers) => offers,
            Err(e) => {
                warn!("Failed to load offerings: {}", e);
                Vec::new()
            }
        }
    }

    async fn purchase(&self, offer: &Offer) -> Result<PurchaseOutcome, SubscriptionError> {
        self.ensure_initialized().await?;
        match self.sdk.purchase_package(offer).await {
            Ok(info) if info.has_premium() => {
                info!("Purchased {}", offer.identifier);
                Ok(PurchaseOutcome::Purchased)
            }
            Ok(_) => {
                warn!("Purchase of {} completed without premium entitlement", offer.identifier);
                Ok(PurchaseOutcome::NotEntitled)
            }
            Err(SdkError::UserCancelled) => Ok(PurchaseOutcome::Cancelled),
            Err(e) => Err(e.into()),
        }
    }

    async fn restore(&self) -> bool {
        if self.ensure_initialized().await.is_err() {
            return false;
        }
        match self.sdk.restore_purchases().await {
            Ok(info) => info.has_premium(),
            Err(e) => {
                warn!("Restore failed: {}", e);
                false
            }
        }
    }

    async fn check_status(&self) -> EntitlementStatus {
        if self.ensure_initialized().await.is_err() {
            return EntitlementStatus::inactive();
        }
        match self.sdk.get_customer_info().await {
            Ok(info) => EntitlementStatus::from_customer_info(&info),
            Err(e) => {
                warn!("Failed to check subscription: {}", e);
                EntitlementStatus::inactive()
            }
        }
    }

    async fn current_user_id(&self) -> Option<String> {
        self.ensure_initialized().await.ok()?;
        match self.sdk.get_customer_info().await {
            Ok(info) => Some(info.original_app_user_id),
            Err(e) => {
                warn!("Failed to read customer info: {}", e);
                None
            }
        }
    }

    fn environment(&self) -> RuntimeEnvironment {
        RuntimeEnvironment::Native
    }
}
