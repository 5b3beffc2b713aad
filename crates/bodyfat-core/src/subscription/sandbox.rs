//! Stand-in gate for runtimes without a native purchase SDK

use async_trait::async_trait;
use tracing::info;

use super::types::{EntitlementStatus, Offer, OfferProduct, PackageType, PurchaseOutcome};
use super::{SubscriptionError, SubscriptionGate};
use crate::config::RuntimeEnvironment;

/// Returns canned offers, never completes a purchase and always reports an
/// inactive entitlement
#[derive(Debug, Default)]
pub struct SandboxGate;

impl SandboxGate {
    /// Create the sandbox gate
    pub fn new() -> Self {
        Self
    }

    /// The fixed monthly and annual offers
    pub fn canned_offers() -> Vec<Offer> {
        vec![
            Offer {
                identifier: "$rc_monthly".to_string(),
                package_type: PackageType::Monthly,
                product: OfferProduct {
                    identifier: "monthly".to_string(),
                    price_string: "$4.99".to_string(),
                    title: "Monthly Premium".to_string(),
                    description: "Monthly subscription (sandbox)".to_string(),
                },
            },
            Offer {
                identifier: "$rc_annual".to_string(),
                package_type: PackageType::Annual,
                product: OfferProduct {
                    identifier: "yearly".to_string(),
                    price_string: "$39.99".to_string(),
                    title: "Annual Premium".to_string(),
                    description: "Annual subscription (sandbox)".to_string(),
                },
            },
        ]
    }
}

#[async_trait]
impl SubscriptionGate for SandboxGate {
    async fn initialize(&self, _user_id: Option<&str>) -> Result<(), SubscriptionError> {
        info!("Subscription gate running sandboxed; purchases disabled");
        Ok(())
    }

    async fn list_offers(&self) -> Vec<Offer> {
        Self::canned_offers()
    }

    async fn purchase(&self, _offer: &Offer) -> Result<PurchaseOutcome, SubscriptionError> {
        Ok(PurchaseOutcome::Unavailable)
    }

    async fn restore(&self) -> bool {
        false
    }

    async fn check_status(&self) -> EntitlementStatus {
        EntitlementStatus::inactive()
    }

    async fn current_user_id(&self) -> Option<String> {
        None
    }

    fn environment(&self) -> RuntimeEnvironment {
        RuntimeEnvironment::Sandboxed
    }
}
