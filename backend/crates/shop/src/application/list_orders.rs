//! List Orders Use Case
//!
//! Admins list across every user; customers are pinned to their own orders.
//! The optional status filter applies inside that scope.

use std::sync::Arc;

use kernel::error::app_error::AppResult;
use kernel::identity::Identity;
use kernel::pagination::{Page, PageRequest};

use crate::domain::entity::order::{Order, OrderFilter, OrderStatus};
use crate::domain::repository::OrderRepository;

#[derive(Debug, Clone, Default)]
pub struct ListOrdersInput {
    pub status: Option<OrderStatus>,
    pub page: PageRequest,
}

pub struct ListOrdersUseCase<O>
where
    O: OrderRepository,
{
    orders: Arc<O>,
}

impl<O> ListOrdersUseCase<O>
where
    O: OrderRepository,
{
    pub fn new(orders: Arc<O>) -> Self {
        Self { orders }
    }

    pub async fn execute(&self, caller: &Identity, input: ListOrdersInput) -> AppResult<Page<Order>> {
        let filter = OrderFilter {
            user_id: (!caller.is_admin()).then_some(caller.id),
            status: input.status,
        };

        self.orders.list(&filter, input.page).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::identity;
    use crate::infra::memory::InMemoryOrderRepository;
    use chrono::{Duration, Utc};
    use kernel::id::{BookId, OrderId};
    use kernel::identity::Role;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_customer_sees_only_own_orders() {
        let ada = identity(Role::Customer);
        let bob = identity(Role::Customer);
        let orders = Arc::new(InMemoryOrderRepository::new());
        for i in 0..3 {
            orders.insert(Order::place(ada.id, BookId::new(), 100, format!("pi_a{i}")));
        }
        for i in 0..2 {
            orders.insert(Order::place(bob.id, BookId::new(), 100, format!("pi_b{i}")));
        }
        let uc = ListOrdersUseCase::new(orders);

        let page = uc.execute(&ada, ListOrdersInput::default()).await.unwrap();
        assert_eq!(page.total_items, 3);
        assert!(page.items.iter().all(|o| o.user_id == ada.id));

        let all = uc
            .execute(&identity(Role::Admin), ListOrdersInput::default())
            .await
            .unwrap();
        assert_eq!(all.total_items, 5);
    }

    #[tokio::test]
    async fn test_status_filter_and_paging() {
        let ada = identity(Role::Customer);
        let orders = Arc::new(InMemoryOrderRepository::new());
        for i in 0..5 {
            let mut order = Order::place(ada.id, BookId::new(), 100, format!("pi_{i}"));
            if i % 2 == 0 {
                order.status = OrderStatus::Paid;
            }
            orders.insert(order);
        }
        let uc = ListOrdersUseCase::new(orders);

        let paid = uc
            .execute(
                &ada,
                ListOrdersInput {
                    status: Some(OrderStatus::Paid),
                    page: PageRequest::new(Some(1), Some(2)),
                },
            )
            .await
            .unwrap();
        assert_eq!(paid.total_items, 3);
        assert_eq!(paid.total_pages, 2);
        assert_eq!(paid.items.len(), 2);
        assert!(paid.items.iter().all(|o| o.is_paid()));
    }

    #[tokio::test]
    async fn test_newest_first_ties_by_id() {
        let ada = identity(Role::Customer);
        let orders = Arc::new(InMemoryOrderRepository::new());
        let now = Utc::now();
        for (intent, minutes_ago, id) in [
            ("pi_tie_2", 5, 0x2),
            ("pi_old", 10, 0x9),
            ("pi_new", 0, 0x7),
            ("pi_tie_1", 5, 0x1),
        ] {
            let mut order = Order::place(ada.id, BookId::new(), 100, intent.to_string());
            order.id = OrderId::from_uuid(Uuid::from_u128(id));
            order.created_at = now - Duration::minutes(minutes_ago);
            orders.insert(order);
        }
        let uc = ListOrdersUseCase::new(orders);

        let page = |n| ListOrdersInput {
            status: None,
            page: PageRequest::new(Some(n), Some(3)),
        };
        let first = uc.execute(&ada, page(1)).await.unwrap();
        let second = uc.execute(&ada, page(2)).await.unwrap();

        let intents = |p: &Page<Order>| {
            p.items
                .iter()
                .map(|o| o.payment_intent_id.clone().unwrap_or_default())
                .collect::<Vec<_>>()
        };
        assert_eq!(intents(&first), ["pi_new", "pi_tie_1", "pi_tie_2"]);
        assert_eq!(intents(&second), ["pi_old"]);
    }
}
