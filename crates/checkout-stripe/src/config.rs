//! # Stripe Configuration
//!
//! Configuration management for the Stripe gateway.
//! The secret key is loaded from the process environment.

use checkout_core::CheckoutError;
use std::env;
use std::fmt;
use std::time::Duration;

/// Primary environment variable holding the secret key
pub const SECRET_KEY_VAR: &str = "STRIPE_SECRET_KEY";

/// Older lowercase name still honoured when the primary is unset
pub const LEGACY_SECRET_KEY_VAR: &str = "stripe_key";

const DEFAULT_API_BASE_URL: &str = "https://api.stripe.com";
const DEFAULT_API_VERSION: &str = "2024-12-18.acacia";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const KEY_PREFIXES: &[&str] = &["sk_test_", "sk_live_", "rk_test_", "rk_live_"];

/// Stripe API configuration
#[derive(Clone)]
pub struct StripeConfig {
    /// Secret or restricted API key
    pub secret_key: String,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,

    /// API version
    pub api_version: String,

    /// HTTP client timeout
    pub timeout: Duration,
}

impl StripeConfig {
    /// Load configuration from environment variables (and `.env` if present).
    ///
    /// Reads `STRIPE_SECRET_KEY`, falling back to `stripe_key`.
    pub fn from_env() -> Result<Self, CheckoutError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CheckoutError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret_key = lookup(SECRET_KEY_VAR)
            .or_else(|| lookup(LEGACY_SECRET_KEY_VAR))
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                CheckoutError::Configuration(format!(
                    "Stripe secret key is not defined ({} or {})",
                    SECRET_KEY_VAR, LEGACY_SECRET_KEY_VAR
                ))
            })?;

        if !KEY_PREFIXES.iter().any(|prefix| secret_key.starts_with(prefix)) {
            return Err(CheckoutError::Configuration(format!(
                "{} must start with one of {}",
                SECRET_KEY_VAR,
                KEY_PREFIXES.join(", ")
            )));
        }

        let mut config = Self::new(secret_key);
        if let Some(url) = lookup("STRIPE_API_BASE_URL") {
            config.api_base_url = url;
        }
        Ok(config)
    }

    /// Create config with an explicit key (for testing)
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Check if using test keys
    pub fn is_test_mode(&self) -> bool {
        self.secret_key.starts_with("sk_test_") || self.secret_key.starts_with("rk_test_")
    }

    /// Get authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.secret_key)
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Builder: set HTTP client timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let visible: String = self.secret_key.chars().take(8).collect();
        f.debug_struct("StripeConfig")
            .field("secret_key", &format!("{}****", visible))
            .field("api_base_url", &self.api_base_url)
            .field("api_version", &self.api_version)
            .field("timeout", &self.timeout)
            .finish()
    }
}
