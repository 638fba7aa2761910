//! Shop Backend Module
//!
//! Orders of exactly one book, paid through a payment intent and advanced
//! only by signed payment webhooks. Downloads are gated on `PAID`.
//!
//! - `domain/` - Order entity and status machine, repository and payment traits
//! - `application/` - Create/Get/List/Download and webhook ingestion
//! - `infra/` - PostgreSQL and Stripe implementations
//! - `presentation/` - `/orders` and `/stripe/webhook` routes
//!
//! ## Visibility
//! Customers only ever see their own orders. An order owned by somebody else
//! answers exactly like a missing one.

pub mod application;
pub mod domain;
pub mod infra;
pub mod presentation;

pub use application::config::ShopConfig;
pub use infra::{PgOrderRepository, StripePaymentGateway};
pub use presentation::{ShopAppState, orders_router, webhook_router};
