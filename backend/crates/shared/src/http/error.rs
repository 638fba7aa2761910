//! Error middleware
//!
//! Handlers and middlewares never format error bodies: they return
//! [`AppError`], whose `IntoResponse` only sets the status and stores the
//! error in the response extensions. [`render_errors`] runs last on the way
//! out, takes that error and writes the envelope.

use std::sync::Arc;

use axum::Json;
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::error::app_error::AppError;

/// Error attached to a response, waiting to be rendered
#[derive(Clone)]
pub struct ErrorSlot(Arc<AppError>);

impl ErrorSlot {
    pub fn new(error: AppError) -> Self {
        Self(Arc::new(error))
    }

    pub fn error(&self) -> &AppError {
        &self.0
    }
}

/// `details` is either the error's string form or a list of violations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetails {
    One(String),
    Many(Vec<String>),
}

/// JSON error envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    pub details: ErrorDetails,
}

impl From<&AppError> for ErrorBody {
    fn from(err: &AppError) -> Self {
        let details = if err.details().is_empty() {
            ErrorDetails::One(err.to_string())
        } else {
            ErrorDetails::Many(err.details().to_vec())
        };

        Self {
            message: err.public_message(),
            details,
        }
    }
}

/// Translate the attached [`AppError`] (if any) into the JSON envelope
///
/// Client errors are logged at `warn` with the full source chain; server
/// errors at `error` together with their debug representation.
pub async fn render_errors(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    let mut response = next.run(req).await;

    let Some(slot) = response.extensions_mut().remove::<ErrorSlot>() else {
        return response;
    };
    let err = slot.error();
    let status = response.status();

    if err.is_server_error() {
        tracing::error!(
            %method,
            %path,
            status = status.as_u16(),
            kind = %err.kind(),
            chain = %err.chain(),
            debug = ?err,
            "Request failed"
        );
    } else {
        tracing::warn!(
            %method,
            %path,
            status = status.as_u16(),
            kind = %err.kind(),
            chain = %err.chain(),
            "Request rejected"
        );
    }

    (status, Json(ErrorBody::from(err))).into_response()
}
