//! Payment provider port
//!
//! The provider creates payment intents and notifies intent state changes
//! through signed webhooks.

use kernel::error::app_error::AppResult;
use kernel::id::{BookId, UserId};

/// Charge to prepare for one order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentRequest {
    /// Minor units
    pub amount: i64,
    pub user_id: UserId,
    pub book_id: BookId,
}

/// Intent as created by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntent {
    pub id: String,
    /// Handed to the client once; never persisted
    pub client_secret: String,
}

/// Verified webhook, reduced to what drives orders
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentEvent {
    Succeeded {
        intent_id: String,
        payment_method_id: Option<String>,
    },
    Failed {
        intent_id: String,
    },
    Canceled {
        intent_id: String,
    },
    /// Any other event type; acknowledged and dropped
    Ignored { kind: String },
}

impl PaymentEvent {
    pub fn intent_id(&self) -> Option<&str> {
        match self {
            PaymentEvent::Succeeded { intent_id, .. }
            | PaymentEvent::Failed { intent_id }
            | PaymentEvent::Canceled { intent_id } => Some(intent_id),
            PaymentEvent::Ignored { .. } => None,
        }
    }

    pub fn payment_method_id(&self) -> Option<&str> {
        match self {
            PaymentEvent::Succeeded {
                payment_method_id, ..
            } => payment_method_id.as_deref(),
            _ => None,
        }
    }
}

#[trait_variant::make(PaymentGateway: Send)]
pub trait LocalPaymentGateway {
    async fn create_intent(&self, request: &IntentRequest) -> AppResult<PaymentIntent>;

    /// Verify the signature header and decode the event
    ///
    /// Any verification or decoding failure is `NotValid`.
    fn parse_event(&self, payload: &[u8], signature: &str) -> AppResult<PaymentEvent>;
}
