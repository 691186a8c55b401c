//! # Application State
//!
//! Shared state for the Axum application.
//! Configuration is loaded once at startup; any failure here is fatal.

use checkout_core::{CheckoutError, CheckoutPolicy, CheckoutService, SharedGateway};
use checkout_stripe::StripeCheckoutGateway;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Public base URL, used for the success/cancel redirect targets
    pub base_url: String,
    /// Directory the storefront is served from
    pub public_dir: PathBuf,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Upper bound on one gateway call
    pub gateway_timeout: Duration,
    /// Optional TOML file overriding the checkout policy
    pub policy_file: Option<PathBuf>,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Result<Self, CheckoutError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CheckoutError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(p) => p
                .trim()
                .parse()
                .map_err(|_| CheckoutError::Configuration(format!("PORT is not a valid port: {}", p)))?,
            None => 3000,
        };

        let gateway_timeout = match lookup("GATEWAY_TIMEOUT_SECS") {
            Some(s) => s
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or_else(|| {
                    CheckoutError::Configuration(format!(
                        "GATEWAY_TIMEOUT_SECS must be a positive integer: {}",
                        s
                    ))
                })?,
            None => checkout_core::DEFAULT_GATEWAY_TIMEOUT,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            base_url: lookup("BASE_URL").unwrap_or_else(|| "http://127.0.0.1:3000".to_string()),
            public_dir: lookup("PUBLIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("public")),
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            gateway_timeout,
            policy_file: lookup("CHECKOUT_POLICY_FILE").map(PathBuf::from),
        })
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> Result<SocketAddr, CheckoutError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| {
                CheckoutError::Configuration(format!(
                    "Invalid socket address {}:{}: {}",
                    self.host, self.port, e
                ))
            })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Checkout policy: from `policy_file` when set, otherwise derived from
    /// `base_url`.
    pub fn checkout_policy(&self) -> Result<CheckoutPolicy, CheckoutError> {
        match &self.policy_file {
            Some(path) => {
                let content = std::fs::read_to_string(path).map_err(|e| {
                    CheckoutError::Configuration(format!(
                        "Failed to read {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                let policy = CheckoutPolicy::from_toml(&content)?;
                tracing::info!("Loaded checkout policy from {}", path.display());
                Ok(policy)
            }
            None => Ok(CheckoutPolicy::for_base_url(&self.base_url)),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Checkout orchestrator
    pub checkout: CheckoutService,
    /// Application config
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Load all configuration and construct the Stripe gateway.
    pub fn from_env() -> Result<Self, CheckoutError> {
        let config = AppConfig::from_env()?;
        let gateway = StripeCheckoutGateway::from_env()?;
        Self::with_gateway(config, Arc::new(gateway))
    }

    /// Build state around an explicit gateway
    pub fn with_gateway(config: AppConfig, gateway: SharedGateway) -> Result<Self, CheckoutError> {
        let policy = config.checkout_policy()?;
        let checkout = CheckoutService::new(gateway, policy).with_timeout(config.gateway_timeout);

        Ok(Self {
            checkout,
            config: Arc::new(config),
        })
    }
}
