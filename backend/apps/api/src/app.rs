//! Composition root
//!
//! Merges the bounded-context routers into one application and wraps it in
//! the cross-cutting layers. Adapters are chosen by the caller, so the same
//! router runs against Postgres/S3/Stripe in `main` and against the in-memory
//! doubles in the end-to-end tests.

use std::time::Duration;

use auth::domain::repository::UserRepository;
use auth::domain::service::PasswordResetMailer;
use auth::{AuthAppState, JwtTokenService, auth_router, authenticate};
use axum::error_handling::HandleErrorLayer;
use axum::http::{HeaderValue, Method, header};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::get;
use axum::{BoxError, Json, Router};
use catalog::domain::repository::BookRepository;
use catalog::domain::storage::ObjectStorage;
use catalog::{CatalogAppState, catalog_router};
use kernel::error::app_error::AppError;
use kernel::http::render_errors;
use serde_json::{Value, json};
use shop::domain::payment::PaymentGateway;
use shop::domain::repository::OrderRepository;
use shop::{ShopAppState, orders_router, webhook_router};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;

/// Per-context states sharing the same adapters
pub struct AppState<U, M, R, S, O, P>
where
    U: UserRepository + Send + Sync + 'static,
    M: PasswordResetMailer + Send + Sync + 'static,
    R: BookRepository + Send + Sync + 'static,
    S: ObjectStorage + Send + Sync + 'static,
    O: OrderRepository + Send + Sync + 'static,
    P: PaymentGateway + Send + Sync + 'static,
{
    pub auth: AuthAppState<U, M>,
    pub catalog: CatalogAppState<R, S>,
    pub shop: ShopAppState<O, R, S, P>,
}

/// Settings of the layers wrapped around every route
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub request_timeout: Duration,
    /// `None` allows any origin
    pub cors_allowed_origins: Option<Vec<String>>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            cors_allowed_origins: None,
        }
    }
}

impl From<&AppConfig> for HttpSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            request_timeout: config.request_timeout,
            cors_allowed_origins: config.cors_allowed_origins.clone(),
        }
    }
}

pub fn build_router<U, M, R, S, O, P>(
    state: AppState<U, M, R, S, O, P>,
    settings: &HttpSettings,
) -> Router
where
    U: UserRepository + Send + Sync + 'static,
    M: PasswordResetMailer + Send + Sync + 'static,
    R: BookRepository + Send + Sync + 'static,
    S: ObjectStorage + Send + Sync + 'static,
    O: OrderRepository + Send + Sync + 'static,
    P: PaymentGateway + Send + Sync + 'static,
{
    let authenticated = catalog_router(state.catalog)
        .merge(orders_router(state.shop.clone()))
        .route_layer(from_fn_with_state(
            state.auth.tokens.clone(),
            authenticate::<JwtTokenService>,
        ));

    Router::new()
        .route("/healthcheck", get(healthcheck))
        .merge(auth_router(state.auth))
        .merge(webhook_router(state.shop))
        .merge(authenticated)
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .timeout(settings.request_timeout),
        )
        .layer(from_fn(render_errors))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(settings.cors_allowed_origins.as_deref()))
}

/// GET /healthcheck
async fn healthcheck() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Errors raised by tower layers, the request deadline among them
async fn handle_middleware_error(err: BoxError) -> AppError {
    if err.is::<tower::timeout::error::Elapsed>() {
        AppError::internal("request deadline exceeded")
    } else {
        AppError::internal(format!("unhandled middleware error: {err}"))
    }
}

fn cors_layer(origins: Option<&[String]>) -> CorsLayer {
    let allow_origin = match origins {
        Some(origins) => {
            let origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match origin.parse() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!(%origin, "Ignoring malformed CORS origin");
                        None
                    }
                })
                .collect();
            AllowOrigin::list(origins)
        }
        None => AllowOrigin::from(Any),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
