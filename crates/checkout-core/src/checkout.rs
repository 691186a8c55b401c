//! # Checkout Orchestration
//!
//! Turns a submitted cart into a hosted checkout session:
//! validate shape, normalize every entry, call the gateway once, relay the
//! redirect URL. No state survives the call.

use crate::cart::CheckoutRequest;
use crate::error::{CheckoutError, CheckoutResult};
use crate::gateway::{CheckoutPolicy, GatewaySession, SessionRequest, SharedGateway};
use crate::line_item::normalize_all;
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

/// Default upper bound on a single gateway call
pub const DEFAULT_GATEWAY_TIMEOUT: Duration = Duration::from_secs(10);

/// Checkout request orchestrator.
///
/// Holds the injected gateway handle and the fixed session policy; cheap to
/// share between concurrent requests.
#[derive(Clone)]
pub struct CheckoutService {
    gateway: SharedGateway,
    policy: CheckoutPolicy,
    timeout: Duration,
}

impl CheckoutService {
    pub fn new(gateway: SharedGateway, policy: CheckoutPolicy) -> Self {
        Self {
            gateway,
            policy,
            timeout: DEFAULT_GATEWAY_TIMEOUT,
        }
    }

    /// Builder: set the gateway timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn policy(&self) -> &CheckoutPolicy {
        &self.policy
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn provider_name(&self) -> &'static str {
        self.gateway.provider_name()
    }

    /// Build the gateway request for a cart without submitting it.
    ///
    /// Any invalid entry aborts the whole batch.
    pub fn prepare(&self, request: &CheckoutRequest) -> CheckoutResult<SessionRequest> {
        if request.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let line_items = normalize_all(&request.items)?;

        Ok(SessionRequest {
            line_items,
            policy: self.policy.clone(),
            idempotency_key: Uuid::new_v4().to_string(),
        })
    }

    /// Create a hosted checkout session and return its redirect URL.
    pub async fn create_checkout_session(&self, request: CheckoutRequest) -> CheckoutResult<String> {
        self.open_session(request)
            .await
            .map(|session| session.checkout_url)
    }

    /// Like [`create_checkout_session`](Self::create_checkout_session) but
    /// returns the full session.
    #[instrument(skip(self, request), fields(items = request.len(), provider = self.provider_name()))]
    pub async fn open_session(&self, request: CheckoutRequest) -> CheckoutResult<GatewaySession> {
        let session_request = self.prepare(&request)?;

        info!(
            "Creating checkout: {} line items, quantity={}, total={} cents, key={}",
            session_request.line_items.len(),
            session_request.item_count(),
            session_request.total(),
            session_request.idempotency_key
        );

        let call = self.gateway.create_checkout_session(&session_request);
        let session = match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(session)) => session,
            Ok(Err(e)) => {
                error!("Gateway failed to create checkout session: {}", e);
                return Err(e);
            }
            Err(_) => {
                error!(
                    "Gateway did not respond within {:?}; abandoning session {}",
                    self.timeout, session_request.idempotency_key
                );
                return Err(CheckoutError::GatewayTimeout(self.timeout));
            }
        };

        debug!(
            "Checkout session {} expires at {:?}",
            session.session_id, session.expires_at
        );
        info!("Created checkout session: {}", session.session_id);

        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartItem;
    use crate::gateway::PaymentGateway;
    use crate::line_item::CURRENCY;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct RecordingGateway {
        calls: Mutex<Vec<SessionRequest>>,
        fail_with: Option<String>,
    }

    #[async_trait]
    impl PaymentGateway for RecordingGateway {
        async fn create_checkout_session(
            &self,
            request: &SessionRequest,
        ) -> CheckoutResult<GatewaySession> {
            self.calls.lock().unwrap().push(request.clone());
            if let Some(message) = &self.fail_with {
                return Err(CheckoutError::Gateway {
                    provider: "mock".into(),
                    message: message.clone(),
                });
            }
            Ok(GatewaySession {
                session_id: "cs_test_123".into(),
                checkout_url: "https://checkout.example/cs_test_123".into(),
                provider: "mock".into(),
                expires_at: None,
            })
        }

        fn provider_name(&self) -> &'static str {
            "mock"
        }
    }

    struct StalledGateway;

    #[async_trait]
    impl PaymentGateway for StalledGateway {
        async fn create_checkout_session(
            &self,
            _request: &SessionRequest,
        ) -> CheckoutResult<GatewaySession> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Err(CheckoutError::Network("unreachable".into()))
        }

        fn provider_name(&self) -> &'static str {
            "stalled"
        }
    }

    fn service(gateway: Arc<RecordingGateway>) -> CheckoutService {
        CheckoutService::new(gateway, CheckoutPolicy::default())
    }

    #[tokio::test]
    async fn test_successful_checkout_returns_url() {
        let gateway = Arc::new(RecordingGateway::default());
        let request = CheckoutRequest::new(vec![CartItem::new("12.5")
            .with_title("Mug")
            .with_quantity(2.0)]);

        let url = service(gateway.clone())
            .create_checkout_session(request)
            .await
            .unwrap();

        assert_eq!(url, "https://checkout.example/cs_test_123");

        let calls = gateway.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let line = &calls[0].line_items[0];
        assert_eq!(line.currency, CURRENCY);
        assert_eq!(line.unit_amount, 1250);
        assert_eq!(line.quantity, 2);
        assert_eq!(line.product_name, "Mug");
        assert_eq!(calls[0].policy, CheckoutPolicy::default());
        assert!(!calls[0].idempotency_key.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_price_never_reaches_gateway() {
        let gateway = Arc::new(RecordingGateway::default());
        let request = CheckoutRequest::new(vec![
            CartItem::new(3.0).with_title("Sticker"),
            CartItem::new("abc").with_title("Hoodie"),
        ]);

        let err = service(gateway.clone())
            .create_checkout_session(request)
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 400);
        assert_eq!(err.client_message(), "Invalid price for item: Hoodie");
        assert!(gateway.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_cart_rejected() {
        let gateway = Arc::new(RecordingGateway::default());

        let err = service(gateway.clone())
            .create_checkout_session(CheckoutRequest::default())
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::EmptyCart));
        assert!(gateway.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_gateway_failure_is_internal() {
        let gateway = Arc::new(RecordingGateway {
            fail_with: Some("No such price: sk_test_secret".into()),
            ..Default::default()
        });
        let request = CheckoutRequest::new(vec![CartItem::new(1.0)]);

        let err = service(gateway)
            .create_checkout_session(request)
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 500);
        assert!(!err.client_message().contains("sk_test_secret"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_gateway_timeout() {
        let service = CheckoutService::new(Arc::new(StalledGateway), CheckoutPolicy::default())
            .with_timeout(Duration::from_secs(5));
        let request = CheckoutRequest::new(vec![CartItem::new(1.0)]);

        let err = service.create_checkout_session(request).await.unwrap_err();

        assert!(matches!(err, CheckoutError::GatewayTimeout(t) if t == Duration::from_secs(5)));
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_prepare_uses_fresh_idempotency_keys() {
        let service = service(Arc::new(RecordingGateway::default()));
        let request = CheckoutRequest::new(vec![CartItem::new(1.0)]);

        let first = service.prepare(&request).unwrap();
        let second = service.prepare(&request).unwrap();

        assert_ne!(first.idempotency_key, second.idempotency_key);
        assert_eq!(first.line_items, second.line_items);
    }
}
