//! # checkout-core
//!
//! Core types and orchestration for the storefront checkout backend.
//!
//! This crate provides:
//! - `CartItem` and `CheckoutRequest` for untrusted cart input
//! - `normalize` / `GatewayLineItem` for gateway-ready line items
//! - `PaymentGateway` trait and `CheckoutPolicy` for hosted checkout providers
//! - `CheckoutService` to turn a cart into a redirect URL
//! - `CheckoutError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use checkout_core::{CheckoutPolicy, CheckoutRequest, CheckoutService};
//!
//! let service = CheckoutService::new(gateway, CheckoutPolicy::default());
//!
//! let request = CheckoutRequest::from_slice(br#"{"items":[{"title":"Mug","price":"12.5"}]}"#)?;
//! let url = service.create_checkout_session(request).await?;
//!
//! // Redirect the customer to `url`
//! ```

pub mod cart;
pub mod checkout;
pub mod error;
pub mod gateway;
pub mod line_item;

// Re-exports for convenience
pub use cart::{CartItem, CheckoutRequest, PriceInput, INVALID_ITEMS_MESSAGE};
pub use checkout::{CheckoutService, DEFAULT_GATEWAY_TIMEOUT};
pub use error::{CheckoutError, CheckoutResult, ErrorKind, INTERNAL_ERROR_MESSAGE};
pub use gateway::{
    BillingAddressCollection, CheckoutMode, CheckoutPolicy, GatewaySession, PaymentGateway,
    PaymentMethod, SessionRequest, SharedGateway,
};
pub use line_item::{normalize, normalize_all, GatewayLineItem, CURRENCY, DEFAULT_PRODUCT_NAME};
