//! # Routes
//!
//! Axum router configuration for the storefront.

use crate::handlers;
use crate::state::AppState;
use axum::{
    handler::HandlerWithoutStateExt,
    routing::{get, get_service, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - GET  /                 - Storefront entry document (`index.html`)
/// - POST /checkout         - Create a hosted checkout session
/// - POST /stripe-checkout  - Same as /checkout (older storefront path)
/// - GET  /success          - Post-payment landing page
/// - GET  /cancel           - Cancelled-payment landing page
/// - GET  /health           - Health check
/// - anything else          - Static file from the public directory, or
///   `404 Page not found`. Directories are never listed or indexed.
pub fn create_router(state: AppState) -> Router {
    let public_dir = state.config.public_dir.clone();
    let index = public_dir.join("index.html");

    let static_files = ServeDir::new(&public_dir)
        .append_index_html_on_directories(false)
        .call_fallback_on_method_not_allowed(true)
        .not_found_service(handlers::not_found.into_service());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Storefront
        .route("/", get_service(ServeFile::new(index)))
        // Checkout
        .route("/checkout", post(handlers::create_checkout))
        .route("/stripe-checkout", post(handlers::create_checkout))
        // Redirect targets
        .route("/success", get(handlers::checkout_success))
        .route("/cancel", get(handlers::checkout_cancel))
        .route("/health", get(handlers::health))
        // Static assets, then 404
        .fallback_service(static_files)
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        // State
        .with_state(state)
}
