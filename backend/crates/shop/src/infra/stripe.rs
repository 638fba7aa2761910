//! [`PaymentGateway`] backed by Stripe

use kernel::error::app_error::{AppError, AppResult};
use platform::stripe::{CreatePaymentIntent, Event, StripeClient, WebhookVerifier};

use crate::domain::payment::{IntentRequest, PaymentEvent, PaymentGateway, PaymentIntent};

pub const DEFAULT_CURRENCY: &str = "usd";

#[derive(Debug, Clone)]
pub struct StripePaymentGateway {
    client: StripeClient,
    verifier: WebhookVerifier,
    currency: String,
}

impl StripePaymentGateway {
    pub fn new(client: StripeClient, verifier: WebhookVerifier, currency: impl Into<String>) -> Self {
        Self {
            client,
            verifier,
            currency: currency.into(),
        }
    }
}

impl PaymentGateway for StripePaymentGateway {
    async fn create_intent(&self, request: &IntentRequest) -> AppResult<PaymentIntent> {
        let params = CreatePaymentIntent {
            amount: request.amount,
            currency: self.currency.clone(),
            metadata: vec![
                ("userId".to_string(), request.user_id.to_string()),
                ("bookId".to_string(), request.book_id.to_string()),
            ],
        };

        let intent = self
            .client
            .create_payment_intent(&params)
            .await
            .map_err(|e| AppError::internal("payment intent creation failed").with_source(e))?;

        let client_secret = intent
            .client_secret
            .ok_or_else(|| AppError::internal("payment intent has no client secret"))?;

        Ok(PaymentIntent {
            id: intent.id,
            client_secret,
        })
    }

    fn parse_event(&self, payload: &[u8], signature: &str) -> AppResult<PaymentEvent> {
        parse_with(&self.verifier, payload, signature)
    }
}

/// Verify and reduce a Stripe webhook
pub(crate) fn parse_with(
    verifier: &WebhookVerifier,
    payload: &[u8],
    signature: &str,
) -> AppResult<PaymentEvent> {
    let event = verifier
        .construct_event(payload, signature)
        .map_err(|e| AppError::not_valid("webhook", "signature verification failed").with_source(e))?;

    tracing::debug!(event_id = %event.id, kind = %event.kind, "Webhook verified");
    to_payment_event(&event)
}

fn to_payment_event(event: &Event) -> AppResult<PaymentEvent> {
    let payment_event = match event.kind.as_str() {
        "payment_intent.succeeded" => PaymentEvent::Succeeded {
            intent_id: intent_id(event)?,
            payment_method_id: event.payment_method().map(str::to_owned),
        },
        "payment_intent.payment_failed" => PaymentEvent::Failed {
            intent_id: intent_id(event)?,
        },
        "payment_intent.canceled" => PaymentEvent::Canceled {
            intent_id: intent_id(event)?,
        },
        other => PaymentEvent::Ignored {
            kind: other.to_owned(),
        },
    };
    Ok(payment_event)
}

fn intent_id(event: &Event) -> AppResult<String> {
    event
        .object_id()
        .map(str::to_owned)
        .ok_or_else(|| AppError::not_valid("webhook", "event object has no id"))
}
