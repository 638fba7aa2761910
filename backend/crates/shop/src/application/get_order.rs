//! Get Order Use Case

use std::sync::Arc;

use kernel::error::app_error::{AppResult, OptionExt};
use kernel::id::OrderId;
use kernel::identity::Identity;

use crate::domain::entity::order::Order;
use crate::domain::repository::OrderRepository;

/// Load an order the caller may see
///
/// Someone else's order is reported exactly like a missing one.
pub(crate) async fn find_visible<O: OrderRepository>(
    orders: &O,
    caller: &Identity,
    id: &OrderId,
) -> AppResult<Order> {
    orders
        .find_by_id(id)
        .await?
        .filter(|order| caller.can_access(&order.user_id))
        .ok_or_not_found("Order", "no order with this id")
}

pub struct GetOrderUseCase<O>
where
    O: OrderRepository,
{
    orders: Arc<O>,
}

impl<O> GetOrderUseCase<O>
where
    O: OrderRepository,
{
    pub fn new(orders: Arc<O>) -> Self {
        Self { orders }
    }

    pub async fn execute(&self, caller: &Identity, id: OrderId) -> AppResult<Order> {
        find_visible(self.orders.as_ref(), caller, &id).await
    }
}
