//! Application Layer
//!
//! Use cases of the shop.

pub mod config;
pub mod create_order;
pub mod download_book;
pub mod get_order;
pub mod handle_webhook;
pub mod list_orders;

// Re-exports
pub use config::ShopConfig;
pub use create_order::{CreateOrderUseCase, PlacedOrder};
pub use download_book::DownloadBookUseCase;
pub use get_order::GetOrderUseCase;
pub use handle_webhook::{HandleWebhookUseCase, WebhookOutcome};
pub use list_orders::{ListOrdersInput, ListOrdersUseCase};
