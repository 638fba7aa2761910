//! HTTP Handlers

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use catalog::domain::repository::BookRepository;
use catalog::domain::storage::ObjectStorage;
use kernel::error::app_error::{AppError, AppResult};
use kernel::http::{AppJson, AppPath, AppQuery, CurrentUser};
use kernel::id::{BookId, OrderId};
use kernel::pagination::{Page, PageRequest};

use crate::application::{
    CreateOrderUseCase, DownloadBookUseCase, GetOrderUseCase, HandleWebhookUseCase,
    ListOrdersInput, ListOrdersUseCase, ShopConfig,
};
use crate::domain::entity::order::OrderStatus;
use crate::domain::payment::PaymentGateway;
use crate::domain::repository::OrderRepository;
use crate::presentation::dto::{CreateOrderRequest, ListOrdersQuery, OrderResponse};

const SIGNATURE_HEADER: &str = "stripe-signature";

/// Shared state for shop handlers
pub struct ShopAppState<O, B, S, P>
where
    O: OrderRepository + Send + Sync + 'static,
    B: BookRepository + Send + Sync + 'static,
    S: ObjectStorage + Send + Sync + 'static,
    P: PaymentGateway + Send + Sync + 'static,
{
    pub orders: Arc<O>,
    pub books: Arc<B>,
    pub storage: Arc<S>,
    pub payments: Arc<P>,
    pub config: ShopConfig,
}

impl<O, B, S, P> Clone for ShopAppState<O, B, S, P>
where
    O: OrderRepository + Send + Sync + 'static,
    B: BookRepository + Send + Sync + 'static,
    S: ObjectStorage + Send + Sync + 'static,
    P: PaymentGateway + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            orders: self.orders.clone(),
            books: self.books.clone(),
            storage: self.storage.clone(),
            payments: self.payments.clone(),
            config: self.config.clone(),
        }
    }
}

/// A path id that is not a UUID names no order
fn parse_order_id(raw: &str) -> AppResult<OrderId> {
    OrderId::parse_str(raw)
        .map_err(|e| AppError::entity_not_found("Order", "malformed order id").with_source(e))
}

// ============================================================================
// List
// ============================================================================

/// GET /orders
pub async fn list_orders<O, B, S, P>(
    State(state): State<ShopAppState<O, B, S, P>>,
    CurrentUser(caller): CurrentUser,
    AppQuery(query): AppQuery<ListOrdersQuery>,
) -> AppResult<Json<Page<OrderResponse>>>
where
    O: OrderRepository + Send + Sync + 'static,
    B: BookRepository + Send + Sync + 'static,
    S: ObjectStorage + Send + Sync + 'static,
    P: PaymentGateway + Send + Sync + 'static,
{
    let status = query
        .status
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.trim().parse::<OrderStatus>())
        .transpose()?;

    let page = ListOrdersUseCase::new(state.orders)
        .execute(
            &caller,
            ListOrdersInput {
                status,
                page: PageRequest::new(query.page, query.per_page),
            },
        )
        .await?;

    Ok(Json(page.map(OrderResponse::from)))
}

// ============================================================================
// Create
// ============================================================================

/// POST /orders
pub async fn create_order<O, B, S, P>(
    State(state): State<ShopAppState<O, B, S, P>>,
    CurrentUser(caller): CurrentUser,
    AppJson(req): AppJson<CreateOrderRequest>,
) -> AppResult<impl IntoResponse>
where
    O: OrderRepository + Send + Sync + 'static,
    B: BookRepository + Send + Sync + 'static,
    S: ObjectStorage + Send + Sync + 'static,
    P: PaymentGateway + Send + Sync + 'static,
{
    let book_id = BookId::parse_str(req.book_id.trim()).map_err(|e| {
        AppError::not_valid("CreateOrderRequest", "bookId must be a UUID").with_source(e)
    })?;

    let placed = CreateOrderUseCase::new(state.orders, state.books, state.payments)
        .execute(&caller, book_id)
        .await?;

    Ok((StatusCode::CREATED, Json(OrderResponse::from(placed))))
}

// ============================================================================
// Get
// ============================================================================

/// GET /orders/{id}
pub async fn get_order<O, B, S, P>(
    State(state): State<ShopAppState<O, B, S, P>>,
    CurrentUser(caller): CurrentUser,
    AppPath(id): AppPath<String>,
) -> AppResult<Json<OrderResponse>>
where
    O: OrderRepository + Send + Sync + 'static,
    B: BookRepository + Send + Sync + 'static,
    S: ObjectStorage + Send + Sync + 'static,
    P: PaymentGateway + Send + Sync + 'static,
{
    let id = parse_order_id(&id)?;
    let order = GetOrderUseCase::new(state.orders)
        .execute(&caller, id)
        .await?;

    Ok(Json(order.into()))
}

// ============================================================================
// Download
// ============================================================================

/// GET /orders/{id}/download
///
/// `302 Found` to a presigned link of the PDF.
pub async fn download_book<O, B, S, P>(
    State(state): State<ShopAppState<O, B, S, P>>,
    CurrentUser(caller): CurrentUser,
    AppPath(id): AppPath<String>,
) -> AppResult<impl IntoResponse>
where
    O: OrderRepository + Send + Sync + 'static,
    B: BookRepository + Send + Sync + 'static,
    S: ObjectStorage + Send + Sync + 'static,
    P: PaymentGateway + Send + Sync + 'static,
{
    let id = parse_order_id(&id)?;
    let url = DownloadBookUseCase::new(state.orders, state.books, state.storage, state.config)
        .execute(&caller, id)
        .await?;

    Ok((StatusCode::FOUND, [(header::LOCATION, url)]))
}

// ============================================================================
// Webhook
// ============================================================================

/// POST /stripe/webhook
///
/// The raw body is needed for signature verification, so it is taken as
/// bytes rather than JSON.
pub async fn stripe_webhook<O, B, S, P>(
    State(state): State<ShopAppState<O, B, S, P>>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<StatusCode>
where
    O: OrderRepository + Send + Sync + 'static,
    B: BookRepository + Send + Sync + 'static,
    S: ObjectStorage + Send + Sync + 'static,
    P: PaymentGateway + Send + Sync + 'static,
{
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::not_valid("webhook", "Stripe-Signature header missing"))?;

    HandleWebhookUseCase::new(state.orders, state.payments)
        .execute(&body, signature)
        .await?;

    Ok(StatusCode::OK)
}
