//! Create Order Use Case
//!
//! The payment intent is created before the order row is written. When the
//! provider call fails nothing is stored; when the write fails the intent is
//! left orphaned at the provider.

use std::sync::Arc;

use catalog::domain::repository::BookRepository;
use kernel::error::app_error::{AppResult, OptionExt};
use kernel::id::BookId;
use kernel::identity::Identity;

use crate::domain::entity::order::Order;
use crate::domain::payment::{IntentRequest, PaymentGateway};
use crate::domain::repository::OrderRepository;

/// New order plus the client secret of its intent
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub order: Order,
    pub client_secret: String,
}

pub struct CreateOrderUseCase<O, B, P>
where
    O: OrderRepository,
    B: BookRepository,
    P: PaymentGateway,
{
    orders: Arc<O>,
    books: Arc<B>,
    payments: Arc<P>,
}

impl<O, B, P> CreateOrderUseCase<O, B, P>
where
    O: OrderRepository,
    B: BookRepository,
    P: PaymentGateway,
{
    pub fn new(orders: Arc<O>, books: Arc<B>, payments: Arc<P>) -> Self {
        Self {
            orders,
            books,
            payments,
        }
    }

    pub async fn execute(&self, caller: &Identity, book_id: BookId) -> AppResult<PlacedOrder> {
        let book = self
            .books
            .find_by_id(&book_id)
            .await?
            .ok_or_not_found("Book", "no book with this id")?;

        let total = book.price.minor_units();
        let intent = self
            .payments
            .create_intent(&IntentRequest {
                amount: total,
                user_id: caller.id,
                book_id: book.id,
            })
            .await?;

        let order = Order::place(caller.id, book.id, total, intent.id);
        if let Err(e) = self.orders.save(&order).await {
            tracing::error!(
                payment_intent_id = ?order.payment_intent_id,
                "Order not stored, payment intent orphaned"
            );
            return Err(e);
        }

        tracing::info!(
            order_id = %order.id,
            user_id = %order.user_id,
            book_id = %order.book_id,
            total,
            "Order placed"
        );

        Ok(PlacedOrder {
            order,
            client_secret: intent.client_secret,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::identity;
    use crate::domain::entity::order::OrderStatus;
    use crate::infra::memory::{FakePaymentGateway, InMemoryOrderRepository};
    use catalog::infra::memory::{InMemoryBookRepository, sample_book};
    use kernel::error::kind::ErrorKind;
    use kernel::identity::Role;

    struct Fixture {
        orders: Arc<InMemoryOrderRepository>,
        books: Arc<InMemoryBookRepository>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                orders: Arc::new(InMemoryOrderRepository::new()),
                books: Arc::new(InMemoryBookRepository::new()),
            }
        }

        fn use_case(
            &self,
            payments: FakePaymentGateway,
        ) -> (
            CreateOrderUseCase<InMemoryOrderRepository, InMemoryBookRepository, FakePaymentGateway>,
            Arc<FakePaymentGateway>,
        ) {
            let payments = Arc::new(payments);
            (
                CreateOrderUseCase::new(self.orders.clone(), self.books.clone(), payments.clone()),
                payments,
            )
        }
    }

    #[tokio::test]
    async fn test_order_freezes_price_and_links_intent() {
        let fx = Fixture::new();
        let book = sample_book("Euclid", "E.", 4000);
        fx.books.insert(book.clone());
        let (uc, payments) = fx.use_case(FakePaymentGateway::new("whsec"));
        let ada = identity(Role::Customer);

        let placed = uc.execute(&ada, book.id).await.unwrap();

        assert_eq!(placed.order.status, OrderStatus::Pending);
        assert_eq!(placed.order.total, 4000);
        assert_eq!(placed.order.user_id, ada.id);
        assert!(!placed.client_secret.is_empty());
        assert_eq!(payments.requests()[0].amount, 4000);
        assert_eq!(payments.requests()[0].book_id, book.id);

        let stored = fx.orders.get(&placed.order.id).unwrap();
        assert_eq!(stored.payment_intent_id, placed.order.payment_intent_id);
    }

    #[tokio::test]
    async fn test_unknown_book() {
        let fx = Fixture::new();
        let (uc, payments) = fx.use_case(FakePaymentGateway::new("whsec"));
        let err = uc
            .execute(&identity(Role::Customer), BookId::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EntityNotFound);
        assert_eq!(err.subject(), "Book");
        assert!(payments.requests().is_empty());
    }

    #[tokio::test]
    async fn test_provider_failure_writes_nothing() {
        let fx = Fixture::new();
        let book = sample_book("Euclid", "E.", 4000);
        fx.books.insert(book.clone());
        let (uc, _) = fx.use_case(FakePaymentGateway::failing("whsec"));

        let err = uc
            .execute(&identity(Role::Customer), book.id)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(fx.orders.is_empty());
    }
}
