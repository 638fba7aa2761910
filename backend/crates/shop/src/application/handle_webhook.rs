//! Handle Webhook Use Case
//!
//! Verified payment events move `PENDING` orders to `PAID` or `CANCELLED`.
//! Replays, unknown intents and unrelated event types are acknowledged
//! without effect, so the provider stops retrying.

use std::sync::Arc;

use kernel::error::app_error::AppResult;

use crate::domain::entity::order::OrderStatus;
use crate::domain::payment::PaymentGateway;
use crate::domain::repository::OrderRepository;

/// What a delivery did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookOutcome {
    Applied(OrderStatus),
    /// Order already terminal, or a concurrent delivery won
    Unchanged,
    UnknownIntent,
    Ignored,
}

pub struct HandleWebhookUseCase<O, P>
where
    O: OrderRepository,
    P: PaymentGateway,
{
    orders: Arc<O>,
    payments: Arc<P>,
}

impl<O, P> HandleWebhookUseCase<O, P>
where
    O: OrderRepository,
    P: PaymentGateway,
{
    pub fn new(orders: Arc<O>, payments: Arc<P>) -> Self {
        Self { orders, payments }
    }

    pub async fn execute(&self, payload: &[u8], signature: &str) -> AppResult<WebhookOutcome> {
        let event = self.payments.parse_event(payload, signature)?;

        let Some(intent_id) = event.intent_id() else {
            tracing::debug!(?event, "Webhook ignored");
            return Ok(WebhookOutcome::Ignored);
        };

        let Some(order) = self.orders.find_by_payment_intent(intent_id).await? else {
            tracing::info!(payment_intent_id = intent_id, "Webhook for unknown intent");
            return Ok(WebhookOutcome::UnknownIntent);
        };

        let Some(next) = order.status.next(&event) else {
            tracing::debug!(order_id = %order.id, status = %order.status, "Webhook replay");
            return Ok(WebhookOutcome::Unchanged);
        };

        let applied = self
            .orders
            .settle(&order.id, next, event.payment_method_id())
            .await?;

        if !applied {
            tracing::debug!(order_id = %order.id, "Order settled concurrently");
            return Ok(WebhookOutcome::Unchanged);
        }

        tracing::info!(
            order_id = %order.id,
            payment_intent_id = intent_id,
            status = %next,
            "Order settled"
        );
        Ok(WebhookOutcome::Applied(next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::order::Order;
    use crate::infra::memory::{FakePaymentGateway, InMemoryOrderRepository, event_payload};
    use kernel::error::kind::ErrorKind;
    use kernel::id::{BookId, UserId};

    struct Fixture {
        orders: Arc<InMemoryOrderRepository>,
        payments: Arc<FakePaymentGateway>,
        order: Order,
    }

    impl Fixture {
        fn new() -> Self {
            let orders = Arc::new(InMemoryOrderRepository::new());
            let order = Order::place(UserId::new(), BookId::new(), 4000, "pi_1".into());
            orders.insert(order.clone());
            Self {
                orders,
                payments: Arc::new(FakePaymentGateway::new("whsec_test")),
                order,
            }
        }

        async fn deliver(&self, payload: &[u8]) -> AppResult<WebhookOutcome> {
            let signature = self.payments.sign(payload);
            HandleWebhookUseCase::new(self.orders.clone(), self.payments.clone())
                .execute(payload, &signature)
                .await
        }

        fn status(&self) -> OrderStatus {
            self.orders.get(&self.order.id).unwrap().status
        }
    }

    #[tokio::test]
    async fn test_success_pays_and_replay_is_noop() {
        let fx = Fixture::new();
        let payload = event_payload("payment_intent.succeeded", "pi_1", Some("pm_1"));

        assert_eq!(
            fx.deliver(&payload).await.unwrap(),
            WebhookOutcome::Applied(OrderStatus::Paid)
        );
        let stored = fx.orders.get(&fx.order.id).unwrap();
        assert_eq!(stored.status, OrderStatus::Paid);
        assert_eq!(stored.payment_method_id.as_deref(), Some("pm_1"));

        assert_eq!(fx.deliver(&payload).await.unwrap(), WebhookOutcome::Unchanged);
        assert_eq!(fx.status(), OrderStatus::Paid);
    }

    #[tokio::test]
    async fn test_paid_order_never_leaves_paid() {
        let fx = Fixture::new();
        fx.deliver(&event_payload("payment_intent.succeeded", "pi_1", None))
            .await
            .unwrap();
        fx.deliver(&event_payload("payment_intent.canceled", "pi_1", None))
            .await
            .unwrap();
        assert_eq!(fx.status(), OrderStatus::Paid);
    }

    #[tokio::test]
    async fn test_failure_cancels() {
        let fx = Fixture::new();
        assert_eq!(
            fx.deliver(&event_payload("payment_intent.payment_failed", "pi_1", None))
                .await
                .unwrap(),
            WebhookOutcome::Applied(OrderStatus::Cancelled)
        );
        assert_eq!(fx.status(), OrderStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_unknown_intent_and_other_events() {
        let fx = Fixture::new();
        assert_eq!(
            fx.deliver(&event_payload("payment_intent.succeeded", "pi_404", None))
                .await
                .unwrap(),
            WebhookOutcome::UnknownIntent
        );
        assert_eq!(
            fx.deliver(&event_payload("charge.refunded", "ch_1", None))
                .await
                .unwrap(),
            WebhookOutcome::Ignored
        );
        assert_eq!(fx.status(), OrderStatus::Pending);
    }

    #[tokio::test]
    async fn test_bad_signature_is_rejected() {
        let fx = Fixture::new();
        let payload = event_payload("payment_intent.succeeded", "pi_1", None);
        let err = HandleWebhookUseCase::new(fx.orders.clone(), fx.payments.clone())
            .execute(&payload, "t=1,v1=deadbeef")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotValid);
        assert_eq!(fx.status(), OrderStatus::Pending);
    }
}
