//! Order Entity and its status machine

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use kernel::error::app_error::AppError;
use kernel::id::{BookId, OrderId, UserId};
use serde::{Deserialize, Serialize};

use crate::domain::payment::PaymentEvent;

/// Order status
///
/// `PENDING` is initial, the two others are terminal. Only payment events
/// move an order, and only out of `PENDING`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
    Cancelled,
}

impl OrderStatus {
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Paid => "PAID",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    #[inline]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, OrderStatus::Pending)
    }

    /// Status reached from `self` on `event`, or `None` when nothing changes
    pub fn next(&self, event: &PaymentEvent) -> Option<OrderStatus> {
        if self.is_terminal() {
            return None;
        }
        match event {
            PaymentEvent::Succeeded { .. } => Some(OrderStatus::Paid),
            PaymentEvent::Failed { .. } | PaymentEvent::Canceled { .. } => {
                Some(OrderStatus::Cancelled)
            }
            PaymentEvent::Ignored { .. } => None,
        }
    }
}

impl FromStr for OrderStatus {
    type Err = AppError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        match code {
            "PENDING" => Ok(OrderStatus::Pending),
            "PAID" => Ok(OrderStatus::Paid),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            other => Err(AppError::not_valid(
                "status",
                format!("unknown order status: {}", other),
            )),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Order entity
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: OrderId,
    pub status: OrderStatus,
    pub payment_intent_id: Option<String>,
    pub payment_method_id: Option<String>,
    pub book_id: BookId,
    pub user_id: UserId,
    /// Book price at creation, in minor units; never recomputed
    pub total: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// New pending order backed by an existing payment intent
    pub fn place(user_id: UserId, book_id: BookId, total: i64, payment_intent_id: String) -> Self {
        let now = Utc::now();
        Self {
            id: OrderId::new(),
            status: OrderStatus::Pending,
            payment_intent_id: Some(payment_intent_id),
            payment_method_id: None,
            book_id,
            user_id,
            total,
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn is_paid(&self) -> bool {
        self.status == OrderStatus::Paid
    }
}

/// Listing filter; `user_id = None` lists across all users
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub user_id: Option<UserId>,
    pub status: Option<OrderStatus>,
}

impl OrderFilter {
    pub fn matches(&self, order: &Order) -> bool {
        self.user_id.is_none_or(|u| u == order.user_id)
            && self.status.is_none_or(|s| s == order.status)
    }
}
