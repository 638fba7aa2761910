//! Auth Middleware
//!
//! Verifies the bearer token and places the caller's
//! [`Identity`](kernel::identity::Identity) into the request extensions,
//! where `kernel::http::CurrentUser` and `kernel::http::require_admin` read it.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use kernel::error::app_error::AppError;

use crate::domain::service::TokenService;

const BEARER_PREFIX: &str = "Bearer ";

/// Middleware that requires a valid bearer token
///
/// Use with `axum::middleware::from_fn_with_state(tokens, authenticate::<T>)`.
pub async fn authenticate<T>(
    State(tokens): State<Arc<T>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError>
where
    T: TokenService,
{
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::unauthorized("header missing"))?;

    let token = value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix(BEARER_PREFIX))
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::unauthorized("format"))?;

    let identity = tokens.extract_user(token)?;

    tracing::debug!(user_id = %identity.id, role = %identity.role, "Request authenticated");

    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, StatusCode};
    use axum::middleware::{from_fn, from_fn_with_state};
    use axum::routing::get;
    use http_body_util::BodyExt;
    use kernel::http::{CurrentUser, ErrorBody, ErrorDetails, render_errors};
    use tower::ServiceExt;

    use crate::domain::entity::user::User;
    use crate::domain::value_object::{
        email::Email, person_name::PersonName, user_password::PasswordHash,
    };
    use crate::infra::jwt::JwtTokenService;

    fn token_service() -> Arc<JwtTokenService> {
        Arc::new(JwtTokenService::new(b"secret", None))
    }

    fn app(tokens: Arc<JwtTokenService>) -> Router {
        Router::new()
            .route(
                "/me",
                get(|CurrentUser(me): CurrentUser| async move { me.email }),
            )
            .route_layer(from_fn_with_state(tokens, authenticate::<JwtTokenService>))
            .layer(from_fn(render_errors))
    }

    async fn call(tokens: Arc<JwtTokenService>, auth: Option<&str>) -> (StatusCode, Vec<u8>) {
        let mut builder = HttpRequest::get("/me");
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        let resp = app(tokens)
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    fn details(bytes: &[u8]) -> String {
        let body: ErrorBody = serde_json::from_slice(bytes).unwrap();
        assert_eq!(body.message, "You are not authorized.");
        match body.details {
            ErrorDetails::One(text) => text,
            ErrorDetails::Many(_) => panic!("expected a single detail string"),
        }
    }

    #[tokio::test]
    async fn test_missing_header() {
        let (status, body) = call(token_service(), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(details(&body), "unauthorized: header missing");
    }

    #[tokio::test]
    async fn test_wrong_format() {
        for value in ["token", "Bearer ", "Basic abc"] {
            let (status, body) = call(token_service(), Some(value)).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(details(&body), "unauthorized: format");
        }
    }

    #[tokio::test]
    async fn test_bad_signature() {
        let (status, body) = call(token_service(), Some("Bearer xyz")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(details(&body), "unauthorized: invalid");
    }

    #[tokio::test]
    async fn test_valid_token_injects_identity() {
        let tokens = token_service();
        let user = User::register(
            PersonName::first("Ada").unwrap(),
            PersonName::last("Lovelace").unwrap(),
            Email::new("a@l.io").unwrap(),
            PasswordHash::from_db(format!("$2b$04${}", "a".repeat(53))).unwrap(),
        );
        let token = tokens.generate(&user).unwrap();

        let (status, body) = call(tokens, Some(&format!("Bearer {token}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"a@l.io");
    }
}
