//! Admin guard and identity extractor
//!
//! Both read the [`Identity`] placed into the request extensions by the
//! authentication middleware of the auth context.

use axum::extract::{FromRequestParts, Request};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;

use crate::error::app_error::AppError;
use crate::identity::Identity;

/// Middleware that only lets administrators through
///
/// No identity at all means the authentication layer did not run or did not
/// succeed: `Unauthorized`. A customer identity is `Forbidden`.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let identity = req
        .extensions()
        .get::<Identity>()
        .ok_or_else(|| AppError::unauthorized("no authenticated user"))?;

    if !identity.is_admin() {
        tracing::debug!(user_id = %identity.id, "Non-admin rejected by admin guard");
        return Err(AppError::forbidden("admin role required"));
    }

    Ok(next.run(req).await)
}

/// Extractor for the authenticated caller
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| AppError::unauthorized("no authenticated user"))
    }
}
