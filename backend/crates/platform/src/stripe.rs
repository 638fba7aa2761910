//! Stripe: payment intents and webhook signatures
//!
//! Intents are created through the form-encoded REST API. Webhooks carry a
//! `Stripe-Signature` header of the form `t=<unix>,v1=<hex>[,v1=<hex>...]`
//! where each `v1` is HMAC-SHA256 over `"<t>.<raw body>"`.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::crypto::{constant_time_eq, hmac_sha256};

pub const DEFAULT_API_BASE: &str = "https://api.stripe.com";

/// Stripe's own default tolerance for webhook timestamps
pub const DEFAULT_TOLERANCE: Duration = Duration::from_secs(300);

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum StripeError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("stripe responded {status}: {message}")]
    Api { status: u16, message: String },

    #[error("signature header malformed: {0}")]
    MalformedHeader(&'static str),

    #[error("no signature matches the payload")]
    SignatureMismatch,

    #[error("signature timestamp outside tolerance")]
    TimestampOutsideTolerance,

    #[error("event payload invalid: {0}")]
    Payload(#[from] serde_json::Error),
}

// ============================================================================
// Payment intents
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    pub status: String,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreatePaymentIntent {
    /// Minor units
    pub amount: i64,
    pub currency: String,
    pub metadata: Vec<(String, String)>,
}

#[derive(Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

#[derive(Clone)]
pub struct StripeClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for StripeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl StripeClient {
    pub fn new(http: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self::with_base_url(http, api_key, DEFAULT_API_BASE)
    }

    pub fn with_base_url(
        http: reqwest::Client,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn create_payment_intent(
        &self,
        params: &CreatePaymentIntent,
    ) -> Result<PaymentIntent, StripeError> {
        let mut form: Vec<(String, String)> = vec![
            ("amount".into(), params.amount.to_string()),
            ("currency".into(), params.currency.clone()),
            ("automatic_payment_methods[enabled]".into(), "true".into()),
        ];
        form.extend(
            params
                .metadata
                .iter()
                .map(|(k, v)| (format!("metadata[{k}]"), v.clone())),
        );

        let response = self
            .http
            .post(format!("{}/v1/payment_intents", self.base_url))
            .bearer_auth(&self.api_key)
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&text)
                .ok()
                .and_then(|env| match (env.error.kind, env.error.message) {
                    (Some(kind), Some(msg)) => Some(format!("{kind}: {msg}")),
                    (None, Some(msg)) => Some(msg),
                    (Some(kind), None) => Some(kind),
                    (None, None) => None,
                })
                .unwrap_or(text);
            return Err(StripeError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let intent: PaymentIntent = response.json().await?;
        tracing::info!(
            payment_intent_id = %intent.id,
            amount = intent.amount,
            currency = %intent.currency,
            "Payment intent created"
        );
        Ok(intent)
    }
}

// ============================================================================
// Webhooks
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub created: i64,
    pub data: EventData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventData {
    pub object: serde_json::Value,
}

impl Event {
    /// `data.object.id`
    pub fn object_id(&self) -> Option<&str> {
        self.data.object.get("id").and_then(|v| v.as_str())
    }

    /// `data.object.payment_method` when it is a plain id
    pub fn payment_method(&self) -> Option<&str> {
        self.data.object.get("payment_method").and_then(|v| v.as_str())
    }
}

#[derive(Clone)]
pub struct WebhookVerifier {
    secret: String,
    tolerance: Duration,
}

impl std::fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookVerifier")
            .field("tolerance", &self.tolerance)
            .finish_non_exhaustive()
    }
}

impl WebhookVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    pub fn with_tolerance(mut self, tolerance: Duration) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Verify against the current clock and parse the event
    pub fn construct_event(&self, payload: &[u8], header: &str) -> Result<Event, StripeError> {
        self.verify(payload, header, chrono::Utc::now().timestamp())?;
        Ok(serde_json::from_slice(payload)?)
    }

    /// Check the signature header for `payload` as of unix time `now`
    pub fn verify(&self, payload: &[u8], header: &str, now: i64) -> Result<(), StripeError> {
        let mut timestamp: Option<&str> = None;
        let mut signatures: Vec<&str> = Vec::new();

        for part in header.split(',') {
            let part = part.trim();
            if let Some(ts) = part.strip_prefix("t=") {
                timestamp = Some(ts);
            } else if let Some(sig) = part.strip_prefix("v1=") {
                signatures.push(sig);
            }
        }

        let timestamp = timestamp.ok_or(StripeError::MalformedHeader("missing timestamp"))?;
        if signatures.is_empty() {
            return Err(StripeError::MalformedHeader("missing v1 signature"));
        }
        let ts: i64 = timestamp
            .parse()
            .map_err(|_| StripeError::MalformedHeader("timestamp is not an integer"))?;

        let expected = hex::encode(sign(&self.secret, timestamp, payload));
        let matched = signatures
            .iter()
            .any(|sig| constant_time_eq(expected.as_bytes(), sig.as_bytes()));
        if !matched {
            return Err(StripeError::SignatureMismatch);
        }

        if now.saturating_sub(ts) > self.tolerance.as_secs() as i64 {
            tracing::warn!(timestamp = ts, now, "Stale webhook signature rejected");
            return Err(StripeError::TimestampOutsideTolerance);
        }

        Ok(())
    }
}

fn sign(secret: &str, timestamp: &str, payload: &[u8]) -> [u8; 32] {
    let mut signed = Vec::with_capacity(timestamp.len() + 1 + payload.len());
    signed.extend_from_slice(timestamp.as_bytes());
    signed.push(b'.');
    signed.extend_from_slice(payload);
    hmac_sha256(secret.as_bytes(), &signed)
}

/// Build a valid `Stripe-Signature` header (local tooling and tests)
pub fn signature_header(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    let ts = timestamp.to_string();
    format!("t={},v1={}", ts, hex::encode(sign(secret, &ts, payload)))
}
