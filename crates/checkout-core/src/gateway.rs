//! # Payment Gateway Trait
//!
//! The seam between checkout orchestration and a hosted payment provider.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  PaymentGateway (trait)                     │
//! │  ├── create_checkout_session()                              │
//! │  └── provider_name()                                        │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!                    ┌───────┴───────┐
//!                    │ StripeCheckout│
//!                    │    Gateway    │
//!                    └───────────────┘
//! ```

use crate::error::{CheckoutError, CheckoutResult};
use crate::line_item::GatewayLineItem;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Accepted payment method types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Card,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
        }
    }
}

/// Checkout mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutMode {
    /// One-time payment
    #[default]
    Payment,
}

impl CheckoutMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutMode::Payment => "payment",
        }
    }
}

/// Whether the hosted page asks for a billing address
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingAddressCollection {
    Auto,
    #[default]
    Required,
}

impl BillingAddressCollection {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingAddressCollection::Auto => "auto",
            BillingAddressCollection::Required => "required",
        }
    }
}

/// Fixed session parameters applied to every checkout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutPolicy {
    #[serde(default = "default_payment_methods")]
    pub payment_method_types: Vec<PaymentMethod>,

    #[serde(default)]
    pub mode: CheckoutMode,

    #[serde(default)]
    pub billing_address_collection: BillingAddressCollection,

    /// URL to redirect after successful payment
    pub success_url: String,

    /// URL to redirect if the customer cancels
    pub cancel_url: String,
}

fn default_payment_methods() -> Vec<PaymentMethod> {
    vec![PaymentMethod::Card]
}

impl CheckoutPolicy {
    /// Card, one-time payment, billing address required, redirecting to
    /// `<base_url>/success` and `<base_url>/cancel`.
    pub fn for_base_url(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            payment_method_types: default_payment_methods(),
            mode: CheckoutMode::Payment,
            billing_address_collection: BillingAddressCollection::Required,
            success_url: format!("{}/success", base),
            cancel_url: format!("{}/cancel", base),
        }
    }

    /// Load a policy from TOML
    pub fn from_toml(toml_str: &str) -> CheckoutResult<Self> {
        toml::from_str(toml_str)
            .map_err(|e| CheckoutError::Configuration(format!("Invalid checkout policy: {}", e)))
    }
}

impl Default for CheckoutPolicy {
    fn default() -> Self {
        Self::for_base_url("http://127.0.0.1:3000")
    }
}

/// Everything the gateway needs to open one hosted checkout session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionRequest {
    pub line_items: Vec<GatewayLineItem>,
    pub policy: CheckoutPolicy,
    /// Sent to the gateway so a retried submit cannot open two sessions
    pub idempotency_key: String,
}

impl SessionRequest {
    /// Order total in cents
    pub fn total(&self) -> i64 {
        self.line_items
            .iter()
            .fold(0i64, |acc, item| acc.saturating_add(item.total()))
    }

    /// Sum of all quantities
    pub fn item_count(&self) -> u64 {
        self.line_items.iter().map(|item| item.quantity).sum()
    }
}

/// A hosted session created by the gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewaySession {
    /// Provider's session ID
    pub session_id: String,

    /// URL to redirect the customer to
    pub checkout_url: String,

    /// Provider name (e.g. "stripe")
    pub provider: String,

    /// When the session expires
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// A hosted payment provider that can open checkout sessions.
///
/// Implementations must be safe to share across concurrent requests.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a hosted checkout session for the given line items and policy.
    async fn create_checkout_session(&self, request: &SessionRequest)
        -> CheckoutResult<GatewaySession>;

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;
}

/// Shared, dynamically dispatched gateway handle
pub type SharedGateway = Arc<dyn PaymentGateway>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_item::CURRENCY;

    #[test]
    fn test_policy_for_base_url() {
        let policy = CheckoutPolicy::for_base_url("https://shop.example/");

        assert_eq!(policy.success_url, "https://shop.example/success");
        assert_eq!(policy.cancel_url, "https://shop.example/cancel");
        assert_eq!(policy.payment_method_types, vec![PaymentMethod::Card]);
        assert_eq!(policy.mode, CheckoutMode::Payment);
        assert_eq!(
            policy.billing_address_collection,
            BillingAddressCollection::Required
        );
    }

    #[test]
    fn test_default_policy_targets_local_server() {
        let policy = CheckoutPolicy::default();
        assert_eq!(policy.success_url, "http://127.0.0.1:3000/success");
        assert_eq!(policy.cancel_url, "http://127.0.0.1:3000/cancel");
    }

    #[test]
    fn test_policy_from_toml() {
        let policy = CheckoutPolicy::from_toml(
            r#"
            success_url = "https://shop.example/thanks"
            cancel_url = "https://shop.example/cart"
            billing_address_collection = "auto"
            "#,
        )
        .unwrap();

        assert_eq!(policy.success_url, "https://shop.example/thanks");
        assert_eq!(policy.billing_address_collection, BillingAddressCollection::Auto);
        assert_eq!(policy.payment_method_types, vec![PaymentMethod::Card]);
        assert_eq!(policy.mode, CheckoutMode::Payment);
    }

    #[test]
    fn test_policy_from_toml_requires_urls() {
        let err = CheckoutPolicy::from_toml("mode = \"payment\"").unwrap_err();
        assert!(matches!(err, CheckoutError::Configuration(_)));
    }

    #[test]
    fn test_session_request_totals() {
        let item = |amount, quantity| GatewayLineItem {
            currency: CURRENCY,
            unit_amount: amount,
            product_name: "x".into(),
            product_images: vec![],
            quantity,
        };
        let request = SessionRequest {
            line_items: vec![item(1250, 2), item(500, 1)],
            policy: CheckoutPolicy::default(),
            idempotency_key: "key".into(),
        };

        assert_eq!(request.total(), 3000);
        assert_eq!(request.item_count(), 3);
    }
}
