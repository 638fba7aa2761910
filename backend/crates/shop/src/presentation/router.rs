//! Shop Routers

use axum::{
    Router,
    routing::{get, post},
};
use catalog::domain::repository::BookRepository;
use catalog::domain::storage::ObjectStorage;

use crate::domain::payment::PaymentGateway;
use crate::domain::repository::OrderRepository;
use crate::presentation::handlers::{self, ShopAppState};

/// `/orders` routes; every handler needs an authenticated caller
pub fn orders_router<O, B, S, P>(state: ShopAppState<O, B, S, P>) -> Router
where
    O: OrderRepository + Send + Sync + 'static,
    B: BookRepository + Send + Sync + 'static,
    S: ObjectStorage + Send + Sync + 'static,
    P: PaymentGateway + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/orders",
            get(handlers::list_orders::<O, B, S, P>).post(handlers::create_order::<O, B, S, P>),
        )
        .route("/orders/{id}", get(handlers::get_order::<O, B, S, P>))
        .route(
            "/orders/{id}/download",
            get(handlers::download_book::<O, B, S, P>),
        )
        .with_state(state)
}

/// `/stripe/webhook`; authenticated by its signature, not by a token
pub fn webhook_router<O, B, S, P>(state: ShopAppState<O, B, S, P>) -> Router
where
    O: OrderRepository + Send + Sync + 'static,
    B: BookRepository + Send + Sync + 'static,
    S: ObjectStorage + Send + Sync + 'static,
    P: PaymentGateway + Send + Sync + 'static,
{
    Router::new()
        .route("/stripe/webhook", post(handlers::stripe_webhook::<O, B, S, P>))
        .with_state(state)
}
