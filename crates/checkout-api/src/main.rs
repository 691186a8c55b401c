//! # Storefront
//!
//! Static storefront plus a hosted-checkout endpoint.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables (or put them in .env)
//! export STRIPE_SECRET_KEY=sk_test_...
//!
//! # Run the server
//! storefront
//! ```

use anyhow::Context;
use checkout_api::{routes, state::AppState};
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let state = match AppState::from_env() {
        Ok(state) => state,
        Err(e) => {
            error!("Refusing to start: {}", e);
            return Err(anyhow::Error::new(e).context("startup configuration"));
        }
    };

    let addr = state.config.socket_addr()?;

    info!("Environment: {}", state.config.environment);
    info!("Serving storefront from {}", state.config.public_dir.display());
    info!(
        "Payment provider: {}, gateway timeout {:?}",
        state.checkout.provider_name(),
        state.checkout.timeout()
    );
    if !state.config.is_production() {
        info!("Success URL: {}", state.checkout.policy().success_url);
        info!("Cancel URL: {}", state.checkout.policy().cancel_url);
    }

    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// `LOG_FORMAT=json` switches to structured JSON lines.
fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
