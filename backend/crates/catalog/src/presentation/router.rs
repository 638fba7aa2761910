//! Catalog Router

use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn;
use axum::{
    Router,
    routing::{get, patch, post},
};
use kernel::http::require_admin;

use crate::domain::repository::BookRepository;
use crate::domain::storage::ObjectStorage;
use crate::presentation::handlers::{self, CatalogAppState};

/// `/books` routes
///
/// Reads are open to any authenticated caller; writes pass the admin guard.
/// Authentication itself is layered on by the caller.
pub fn catalog_router<R, S>(state: CatalogAppState<R, S>) -> Router
where
    R: BookRepository + Send + Sync + 'static,
    S: ObjectStorage + Send + Sync + 'static,
{
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route(
            "/books",
            get(handlers::list_books::<R, S>).merge(
                post(handlers::create_book::<R, S>)
                    .layer(DefaultBodyLimit::max(upload_limit))
                    .route_layer(from_fn(require_admin)),
            ),
        )
        .route(
            "/books/{id}",
            get(handlers::get_book::<R, S>).merge(
                patch(handlers::update_book::<R, S>)
                    .delete(handlers::delete_book::<R, S>)
                    .route_layer(from_fn(require_admin)),
            ),
        )
        .with_state(state)
}
