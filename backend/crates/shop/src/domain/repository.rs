//! Repository Traits

use kernel::error::app_error::AppResult;
use kernel::id::OrderId;
use kernel::pagination::{Page, PageRequest};

use crate::domain::entity::order::{Order, OrderFilter, OrderStatus};

/// Order repository trait
#[trait_variant::make(OrderRepository: Send)]
pub trait LocalOrderRepository {
    async fn save(&self, order: &Order) -> AppResult<()>;

    async fn find_by_id(&self, id: &OrderId) -> AppResult<Option<Order>>;

    async fn find_by_payment_intent(&self, intent_id: &str) -> AppResult<Option<Order>>;

    /// Ordered by `created_at` descending, then `id` ascending
    async fn list(&self, filter: &OrderFilter, page: PageRequest) -> AppResult<Page<Order>>;

    /// Move a `PENDING` order to `status`
    ///
    /// Conditional on the stored status still being `PENDING`; returns
    /// whether this call performed the transition. `payment_method_id`, when
    /// given, is stored with it.
    async fn settle(
        &self,
        id: &OrderId,
        status: OrderStatus,
        payment_method_id: Option<&str>,
    ) -> AppResult<bool>;
}
