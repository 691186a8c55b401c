//! # Checkout Error Types
//!
//! Typed error handling for the storefront checkout flow.
//! All checkout operations return `Result<T, CheckoutError>`.

use std::time::Duration;
use thiserror::Error;

/// Generic text returned to callers for anything that is not their fault.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// Core error type for all checkout operations
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Request body has the wrong shape (missing or non-array `items`, bad JSON)
    #[error("{0}")]
    MalformedRequest(String),

    /// A cart entry carried a price that does not parse to a non-negative amount
    #[error("Invalid price for item: {title}")]
    InvalidPrice { title: String },

    /// The cart contained no entries
    #[error("Cart is empty")]
    EmptyCart,

    /// Payment gateway rejected the request
    #[error("Gateway error [{provider}]: {message}")]
    Gateway { provider: String, message: String },

    /// Payment gateway did not answer in time
    #[error("Gateway request timed out after {0:?}")]
    GatewayTimeout(Duration),

    /// Network/HTTP error communicating with the gateway
    #[error("Network error: {0}")]
    Network(String),

    /// Gateway response could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Missing or invalid configuration (fatal at startup)
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Coarse classification used to pick the response shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Client input was invalid; recoverable, reported verbatim
    MalformedRequest,
    /// The gateway call failed; logged server-side, reported generically
    Gateway,
    /// Configuration problem; only ever fatal at process start
    Startup,
}

impl CheckoutError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CheckoutError::MalformedRequest(_)
            | CheckoutError::InvalidPrice { .. }
            | CheckoutError::EmptyCart => ErrorKind::MalformedRequest,
            CheckoutError::Gateway { .. }
            | CheckoutError::GatewayTimeout(_)
            | CheckoutError::Network(_)
            | CheckoutError::Serialization(_) => ErrorKind::Gateway,
            CheckoutError::Configuration(_) => ErrorKind::Startup,
        }
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::MalformedRequest => 400,
            ErrorKind::Gateway | ErrorKind::Startup => 500,
        }
    }

    /// Text that is safe to hand back to the caller.
    ///
    /// Only client errors echo their detail; gateway and configuration
    /// failures collapse to [`INTERNAL_ERROR_MESSAGE`].
    pub fn client_message(&self) -> String {
        match self.kind() {
            ErrorKind::MalformedRequest => self.to_string(),
            ErrorKind::Gateway | ErrorKind::Startup => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }
}

/// Result type alias for checkout operations
pub type CheckoutResult<T> = Result<T, CheckoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            CheckoutError::MalformedRequest("bad".into()).kind(),
            ErrorKind::MalformedRequest
        );
        assert_eq!(
            CheckoutError::InvalidPrice { title: "Mug".into() }.kind(),
            ErrorKind::MalformedRequest
        );
        assert_eq!(
            CheckoutError::GatewayTimeout(Duration::from_secs(10)).kind(),
            ErrorKind::Gateway
        );
        assert_eq!(
            CheckoutError::Configuration("missing".into()).kind(),
            ErrorKind::Startup
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(CheckoutError::EmptyCart.status_code(), 400);
        assert_eq!(
            CheckoutError::Network("connection reset".into()).status_code(),
            500
        );
    }

    #[test]
    fn test_client_message_hides_gateway_detail() {
        let err = CheckoutError::Gateway {
            provider: "stripe".into(),
            message: "Invalid API Key provided: sk_test_****1234".into(),
        };
        assert_eq!(err.client_message(), INTERNAL_ERROR_MESSAGE);

        let err = CheckoutError::InvalidPrice { title: "Mug".into() };
        assert_eq!(err.client_message(), "Invalid price for item: Mug");
    }
}
