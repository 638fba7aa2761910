//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use kernel::id::{BookId, OrderId, UserId};
use serde::{Deserialize, Serialize};

use crate::application::PlacedOrder;
use crate::domain::entity::order::{Order, OrderStatus};

/// `POST /orders` body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateOrderRequest {
    pub book_id: String,
}

/// `GET /orders` query string
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListOrdersQuery {
    pub status: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Order as seen by clients
///
/// `clientSecret` is only present in the answer to `POST /orders`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: OrderId,
    pub status: OrderStatus,
    pub payment_intent_id: Option<String>,
    pub payment_method_id: Option<String>,
    pub book_id: BookId,
    pub user_id: UserId,
    pub total: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            status: order.status,
            payment_intent_id: order.payment_intent_id,
            payment_method_id: order.payment_method_id,
            book_id: order.book_id,
            user_id: order.user_id,
            total: order.total,
            client_secret: None,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

impl From<PlacedOrder> for OrderResponse {
    fn from(placed: PlacedOrder) -> Self {
        Self {
            client_secret: Some(placed.client_secret),
            ..Self::from(placed.order)
        }
    }
}
