//! Subscription data types

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ENTITLEMENT_KEY;

/// Entitlement state as last reported by the purchase SDK.
///
/// Treated as ephemeral: re-queried whenever the paywall closes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitlementStatus {
    /// Premium is active
    pub is_active: bool,
    /// When the current period ends
    pub expires_at: Option<DateTime<Utc>>,
    /// Product that granted the entitlement
    pub product_id: Option<String>,
}

impl EntitlementStatus {
    /// Not entitled
    pub fn inactive() -> Self {
        Self::default()
    }

    /// Read the premium entitlement out of customer info
    pub fn from_customer_info(info: &CustomerInfo) -> Self {
        match info.active_entitlements.get(ENTITLEMENT_KEY) {
            Some(entitlement) => Self {
                is_active: true,
                expires_at: entitlement.expiration_date,
                product_id: Some(entitlement.product_identifier.clone()),
            },
            None => Self::inactive(),
        }
    }
}

/// Package duration as reported by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PackageType {
    /// Lifetime unlock
    Lifetime,
    /// One year
    Annual,
    /// Six months
    SixMonth,
    /// Three months
    ThreeMonth,
    /// Two months
    TwoMonth,
    /// One month
    Monthly,
    /// One week
    Weekly,
    /// Custom duration
    Custom,
    /// Anything else
    #[serde(other)]
    Unknown,
}

/// Store product behind an offer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferProduct {
    /// Store product id
    pub identifier: String,
    /// Localised price, e.g. "$4.99"
    pub price_string: String,
    /// Store title
    pub title: String,
    /// Store description
    pub description: String,
}

/// A purchasable package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    /// Package id, e.g. `$rc_monthly`
    pub identifier: String,
    /// Package duration
    pub package_type: PackageType,
    /// Underlying product
    pub product: OfferProduct,
}

impl Offer {
    /// Title shown on the paywall
    pub fn display_title(&self) -> &'static str {
        match self.package_type {
            PackageType::Monthly => "Monthly Premium",
            PackageType::Annual => "Annual Premium",
            PackageType::SixMonth => "6-Month Premium",
            _ => "Premium",
        }
    }

    /// Subtitle shown on the paywall
    pub fn display_description(&self) -> &'static str {
        match self.package_type {
            PackageType::Annual => "Best value - Save 50%",
            _ => "Full access to all features",
        }
    }

    /// Price, or `$0.00` when the store gave none
    pub fn price(&self) -> &str {
        if self.product.price_string.is_empty() {
            "$0.00"
        } else {
            &self.product.price_string
        }
    }
}

/// Outcome of a purchase attempt that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseOutcome {
    /// The premium entitlement is now active
    Purchased,
    /// The store completed but premium is not active
    NotEntitled,
    /// The user backed out
    Cancelled,
    /// This runtime cannot purchase
    Unavailable,
}

/// An active entitlement in customer info
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitlementInfo {
    /// Product that granted it
    pub product_identifier: String,
    /// Expiry, none for lifetime
    pub expiration_date: Option<DateTime<Utc>>,
}

/// Customer state returned by the purchase SDK
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    /// Active entitlements keyed by entitlement id
    pub active_entitlements: HashMap<String, EntitlementInfo>,
    /// Stable SDK user id
    pub original_app_user_id: String,
}

impl CustomerInfo {
    /// True when the premium entitlement is active
    pub fn has_premium(&self) -> bool {
        self.active_entitlements.contains_key(ENTITLEMENT_KEY)
    }
}
