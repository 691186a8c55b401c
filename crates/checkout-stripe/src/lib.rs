//! # checkout-stripe
//!
//! Stripe gateway for the storefront checkout backend.
//!
//! **StripeCheckoutGateway** opens a hosted Checkout Session per cart:
//! - Dynamic `price_data` line items (no pre-created Stripe prices)
//! - Card payments, one-time mode, required billing address
//! - Idempotency key per submit
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use checkout_core::{CheckoutPolicy, CheckoutService};
//! use checkout_stripe::StripeCheckoutGateway;
//! use std::sync::Arc;
//!
//! // Reads STRIPE_SECRET_KEY (or the legacy `stripe_key`)
//! let gateway = StripeCheckoutGateway::from_env()?;
//!
//! let service = CheckoutService::new(Arc::new(gateway), CheckoutPolicy::default());
//! let url = service.create_checkout_session(request).await?;
//! ```

pub mod checkout;
pub mod config;

// Re-exports
pub use checkout::{session_form, StripeCheckoutGateway};
pub use config::{StripeConfig, LEGACY_SECRET_KEY_VAR, SECRET_KEY_VAR};
