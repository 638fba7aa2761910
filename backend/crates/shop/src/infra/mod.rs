//! Infrastructure Layer
//!
//! PostgreSQL persistence and the Stripe payment gateway.

#[cfg(any(test, feature = "testing"))]
pub mod memory;
pub mod postgres;
pub mod stripe;

pub use postgres::PgOrderRepository;
pub use stripe::StripePaymentGateway;
