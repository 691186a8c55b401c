//! # Request Handlers
//!
//! Axum request handlers for the storefront checkout API.

use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use checkout_core::{CheckoutError, CheckoutRequest, ErrorKind};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

/// Body for unknown paths
pub const NOT_FOUND_MESSAGE: &str = "Page not found";

// =============================================================================
// Request/Response Types
// =============================================================================

/// Create checkout response
#[derive(Debug, Serialize, Deserialize)]
pub struct CheckoutResponse {
    /// Hosted checkout URL (redirect the customer here)
    pub url: String,
}

/// The one place a `CheckoutError` becomes an HTTP response.
///
/// Client errors are echoed as plain text; everything else is logged in
/// full and answered with a generic message.
pub fn error_response(err: &CheckoutError) -> (StatusCode, String) {
    match err.kind() {
        ErrorKind::MalformedRequest => warn!("Rejected checkout request: {}", err),
        ErrorKind::Gateway => error!("Error creating checkout session: {}", err),
        ErrorKind::Startup => error!("Configuration error during request: {}", err),
    }

    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, err.client_message())
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "storefront-checkout",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Create a hosted checkout session from the submitted cart.
///
/// The body is read as raw bytes so shape errors are reported the same way
/// regardless of `Content-Type`.
#[instrument(skip(state, body), fields(body_len = body.len()))]
pub async fn create_checkout(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<CheckoutResponse>, (StatusCode, String)> {
    let request = CheckoutRequest::from_slice(&body).map_err(|e| error_response(&e))?;

    let url = state
        .checkout
        .create_checkout_session(request)
        .await
        .map_err(|e| error_response(&e))?;

    info!("Redirecting customer to hosted checkout");

    Ok(Json(CheckoutResponse { url }))
}

/// Fallback for any path nothing else serves
pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE)
}

#[derive(Debug, Deserialize)]
pub struct SuccessParams {
    pub session_id: Option<String>,
}

/// Checkout success page
pub async fn checkout_success(Query(params): Query<SuccessParams>) -> impl IntoResponse {
    let reference = match params.session_id.as_deref() {
        Some(id) if id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') => {
            format!("<p>Reference: <code>{}</code></p>", id)
        }
        _ => String::new(),
    };

    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Payment Successful</title></head>
<body style="font-family: system-ui; display: flex; justify-content: center; align-items: center; height: 100vh; margin: 0; background: #f4f4f5;">
    <div style="background: white; padding: 60px; border-radius: 16px; text-align: center;">
        <h1>Thank you for your order!</h1>
        {}
        <p style="color: #666;">Your payment was processed successfully.</p>
        <p><a href="/">Back to the shop</a></p>
    </div>
</body>
</html>
"#,
        reference
    ))
}

/// Checkout cancel page
pub async fn checkout_cancel() -> impl IntoResponse {
    Html(
        r#"<!DOCTYPE html>
<html>
<head><title>Payment Cancelled</title></head>
<body style="font-family: system-ui; display: flex; justify-content: center; align-items: center; height: 100vh; margin: 0; background: #f4f4f5;">
    <div style="background: white; padding: 60px; border-radius: 16px; text-align: center;">
        <h1>Payment Cancelled</h1>
        <p style="color: #666;">No charges were made. Your cart is still waiting.</p>
        <p><a href="/">Back to the shop</a></p>
    </div>
</body>
</html>
"#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_malformed_request_maps_to_400() {
        let (status, body) = error_response(&CheckoutError::InvalidPrice {
            title: "Mug".into(),
        });
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "Invalid price for item: Mug");
    }

    #[test]
    fn test_gateway_errors_map_to_generic_500() {
        let errors = [
            CheckoutError::Gateway {
                provider: "stripe".into(),
                message: "Invalid API Key provided: sk_test_****abc".into(),
            },
            CheckoutError::GatewayTimeout(Duration::from_secs(10)),
            CheckoutError::Network("connection refused".into()),
        ];

        for err in &errors {
            let (status, body) = error_response(err);
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body, "Internal Server Error");
        }
    }
}
