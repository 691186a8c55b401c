//! # checkout-api
//!
//! HTTP layer for the storefront checkout backend.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - The checkout endpoint that turns a cart into a hosted checkout URL
//! - Static storefront serving without directory listings
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/` | Storefront |
//! | POST | `/checkout` | Create checkout session |
//! | POST | `/stripe-checkout` | Alias of `/checkout` |
//! | GET | `/success`, `/cancel` | Redirect landing pages |
//! | GET | `/health` | Health check |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
