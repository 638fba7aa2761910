//! In-memory doubles for tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use kernel::error::app_error::{AppError, AppResult};
use kernel::id::OrderId;
use kernel::pagination::{Page, PageRequest, paginate};
use platform::stripe::{WebhookVerifier, signature_header};

use crate::domain::entity::order::{Order, OrderFilter, OrderStatus};
use crate::domain::payment::{IntentRequest, PaymentEvent, PaymentGateway, PaymentIntent};
use crate::domain::repository::OrderRepository;
use crate::infra::stripe::parse_with;

// ============================================================================
// Orders
// ============================================================================

/// [`OrderRepository`] over a map, ordered like the SQL implementation
#[derive(Debug, Default)]
pub struct InMemoryOrderRepository {
    orders: Mutex<HashMap<OrderId, Order>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, order: Order) {
        self.lock().insert(order.id, order);
    }

    pub fn get(&self, id: &OrderId) -> Option<Order> {
        self.lock().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<OrderId, Order>> {
        self.orders.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl OrderRepository for InMemoryOrderRepository {
    async fn save(&self, order: &Order) -> AppResult<()> {
        let mut orders = self.lock();
        if orders
            .values()
            .any(|o| o.payment_intent_id.is_some() && o.payment_intent_id == order.payment_intent_id)
        {
            return Err(AppError::duplicate_key(
                "paymentIntentId",
                "an order already uses this payment intent",
            ));
        }
        orders.insert(order.id, order.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &OrderId) -> AppResult<Option<Order>> {
        Ok(self.get(id))
    }

    async fn find_by_payment_intent(&self, intent_id: &str) -> AppResult<Option<Order>> {
        Ok(self
            .lock()
            .values()
            .find(|o| o.payment_intent_id.as_deref() == Some(intent_id))
            .cloned())
    }

    async fn list(&self, filter: &OrderFilter, page: PageRequest) -> AppResult<Page<Order>> {
        let mut matching: Vec<Order> = self
            .lock()
            .values()
            .filter(|o| filter.matches(o))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(paginate(&matching, page))
    }

    async fn settle(
        &self,
        id: &OrderId,
        status: OrderStatus,
        payment_method_id: Option<&str>,
    ) -> AppResult<bool> {
        let mut orders = self.lock();
        match orders.get_mut(id) {
            Some(order) if order.status == OrderStatus::Pending => {
                order.status = status;
                if let Some(pm) = payment_method_id {
                    order.payment_method_id = Some(pm.to_string());
                }
                order.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

// ============================================================================
// Payments
// ============================================================================

/// [`PaymentGateway`] that mints fake intents and verifies webhooks with a
/// real Stripe signature check against `webhook_secret`
#[derive(Debug)]
pub struct FakePaymentGateway {
    verifier: WebhookVerifier,
    webhook_secret: String,
    requests: Mutex<Vec<IntentRequest>>,
    counter: AtomicU64,
    fail: bool,
}

impl FakePaymentGateway {
    pub fn new(webhook_secret: impl Into<String>) -> Self {
        let webhook_secret = webhook_secret.into();
        Self {
            verifier: WebhookVerifier::new(webhook_secret.clone()),
            webhook_secret,
            requests: Mutex::new(Vec::new()),
            counter: AtomicU64::new(0),
            fail: false,
        }
    }

    /// Every intent creation fails
    pub fn failing(webhook_secret: impl Into<String>) -> Self {
        Self {
            fail: true,
            ..Self::new(webhook_secret)
        }
    }

    /// Intent requests received so far
    pub fn requests(&self) -> Vec<IntentRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Valid `Stripe-Signature` header for `payload`, signed now
    pub fn sign(&self, payload: &[u8]) -> String {
        signature_header(&self.webhook_secret, Utc::now().timestamp(), payload)
    }
}

/// Stripe-shaped event body
pub fn event_payload(kind: &str, intent_id: &str, payment_method: Option<&str>) -> Vec<u8> {
    let payment_method = match payment_method {
        Some(pm) => format!(r#","payment_method":"{pm}""#),
        None => String::new(),
    };
    format!(
        r#"{{"id":"evt_{intent_id}","type":"{kind}","created":{},"data":{{"object":{{"id":"{intent_id}"{payment_method}}}}}}}"#,
        Utc::now().timestamp()
    )
    .into_bytes()
}

impl PaymentGateway for FakePaymentGateway {
    async fn create_intent(&self, request: &IntentRequest) -> AppResult<PaymentIntent> {
        if self.fail {
            return Err(AppError::internal("payment provider unavailable"));
        }
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request.clone());

        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        let id = format!("pi_fake_{n}");
        Ok(PaymentIntent {
            client_secret: format!("{id}_secret_{n:04}"),
            id,
        })
    }

    fn parse_event(&self, payload: &[u8], signature: &str) -> AppResult<PaymentEvent> {
        parse_with(&self.verifier, payload, signature)
    }
}
