//! Domain Layer

pub mod entity;
pub mod payment;
pub mod repository;

pub use entity::order::{Order, OrderFilter, OrderStatus};
pub use payment::{IntentRequest, PaymentEvent, PaymentGateway, PaymentIntent};
pub use repository::OrderRepository;
