//! # Stripe Checkout Sessions
//!
//! `PaymentGateway` implementation backed by the Stripe Checkout Sessions API.
//! The customer is redirected to Stripe's hosted page; no card data touches
//! this server.

use crate::config::StripeConfig;
use async_trait::async_trait;
use checkout_core::{CheckoutError, CheckoutResult, GatewaySession, PaymentGateway, SessionRequest};
use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

const PROVIDER: &str = "stripe";

/// Stripe Checkout Session gateway
pub struct StripeCheckoutGateway {
    config: StripeConfig,
    client: Client,
}

impl StripeCheckoutGateway {
    /// Create a new Stripe checkout gateway
    pub fn new(config: StripeConfig) -> CheckoutResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CheckoutError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> CheckoutResult<Self> {
        Self::new(StripeConfig::from_env()?)
    }

    pub fn config(&self) -> &StripeConfig {
        &self.config
    }

    fn map_transport_error(&self, e: reqwest::Error) -> CheckoutError {
        if e.is_timeout() {
            CheckoutError::GatewayTimeout(self.config.timeout)
        } else {
            CheckoutError::Network(e.to_string())
        }
    }
}

/// Form body for `POST /v1/checkout/sessions`, in Stripe's bracketed
/// parameter notation.
pub fn session_form(request: &SessionRequest) -> Vec<(String, String)> {
    let policy = &request.policy;

    let mut form: Vec<(String, String)> = policy
        .payment_method_types
        .iter()
        .enumerate()
        .map(|(i, method)| (format!("payment_method_types[{}]", i), method.as_str().to_string()))
        .collect();

    form.push(("mode".to_string(), policy.mode.as_str().to_string()));
    form.push(("success_url".to_string(), policy.success_url.clone()));
    form.push(("cancel_url".to_string(), policy.cancel_url.clone()));
    form.push((
        "billing_address_collection".to_string(),
        policy.billing_address_collection.as_str().to_string(),
    ));

    for (i, item) in request.line_items.iter().enumerate() {
        form.push((
            format!("line_items[{}][price_data][currency]", i),
            item.currency.to_string(),
        ));
        form.push((
            format!("line_items[{}][price_data][unit_amount]", i),
            item.unit_amount.to_string(),
        ));
        form.push((
            format!("line_items[{}][price_data][product_data][name]", i),
            item.product_name.clone(),
        ));
        for (j, image) in item.product_images.iter().enumerate() {
            form.push((
                format!("line_items[{}][price_data][product_data][images][{}]", i, j),
                image.clone(),
            ));
        }
        form.push((format!("line_items[{}][quantity]", i), item.quantity.to_string()));
    }

    form
}

#[async_trait]
impl PaymentGateway for StripeCheckoutGateway {
    #[instrument(skip(self, request), fields(items = request.line_items.len(), idempotency_key = %request.idempotency_key))]
    async fn create_checkout_session(
        &self,
        request: &SessionRequest,
    ) -> CheckoutResult<GatewaySession> {
        let form = session_form(request);
        let url = format!("{}/v1/checkout/sessions", self.config.api_base_url);

        debug!("Creating Stripe checkout session: {} form fields", form.len());

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .header("Idempotency-Key", &request.idempotency_key)
            .form(&form)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !status.is_success() {
            error!("Stripe API error: status={}, body={}", status, body);

            if let Ok(error_response) = serde_json::from_str::<StripeErrorResponse>(&body) {
                let err = error_response.error;
                let message = match (err.error_type, err.code) {
                    (Some(kind), Some(code)) => format!("{} ({}/{})", err.message, kind, code),
                    (Some(kind), None) => format!("{} ({})", err.message, kind),
                    _ => err.message,
                };
                return Err(CheckoutError::Gateway {
                    provider: PROVIDER.to_string(),
                    message,
                });
            }

            return Err(CheckoutError::Gateway {
                provider: PROVIDER.to_string(),
                message: format!("HTTP {}: {}", status, body),
            });
        }

        let session: StripeCheckoutSessionResponse = serde_json::from_str(&body).map_err(|e| {
            CheckoutError::Serialization(format!("Failed to parse Stripe response: {}", e))
        })?;

        let checkout_url = session.url.ok_or_else(|| {
            CheckoutError::Serialization(format!("Stripe session {} has no url", session.id))
        })?;

        info!(
            "Created Stripe checkout session: id={}, url={}",
            session.id, checkout_url
        );

        Ok(GatewaySession {
            session_id: session.id,
            checkout_url,
            provider: PROVIDER.to_string(),
            expires_at: session
                .expires_at
                .and_then(|ts| DateTime::from_timestamp(ts, 0)),
        })
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeCheckoutSessionResponse {
    id: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    expires_at: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
    #[serde(default, rename = "type")]
    error_type: Option<String>,
    #[serde(default)]
    code: Option<String>,
}
