//! Download Book Use Case
//!
//! Resolves a paid order to a short-lived link to the book's PDF.

use std::sync::Arc;

use catalog::domain::repository::BookRepository;
use catalog::domain::storage::ObjectStorage;
use kernel::error::app_error::{AppError, AppResult, OptionExt};
use kernel::id::OrderId;
use kernel::identity::Identity;

use crate::application::config::ShopConfig;
use crate::application::get_order::find_visible;
use crate::domain::repository::OrderRepository;

pub struct DownloadBookUseCase<O, B, S>
where
    O: OrderRepository,
    B: BookRepository,
    S: ObjectStorage,
{
    orders: Arc<O>,
    books: Arc<B>,
    storage: Arc<S>,
    config: ShopConfig,
}

impl<O, B, S> DownloadBookUseCase<O, B, S>
where
    O: OrderRepository,
    B: BookRepository,
    S: ObjectStorage,
{
    pub fn new(orders: Arc<O>, books: Arc<B>, storage: Arc<S>, config: ShopConfig) -> Self {
        Self {
            orders,
            books,
            storage,
            config,
        }
    }

    /// Presigned URL of the content
    pub async fn execute(&self, caller: &Identity, id: OrderId) -> AppResult<String> {
        let order = find_visible(self.orders.as_ref(), caller, &id).await?;

        if !order.is_paid() {
            return Err(AppError::order_not_paid(format!(
                "order status is {}",
                order.status
            )));
        }

        let book = self
            .books
            .find_by_id(&order.book_id)
            .await?
            .ok_or_not_found("Book", "the ordered book no longer exists")?;

        let url = self
            .storage
            .presign_get(&book.content_bucket_key, self.config.download_ttl)
            .await?;

        tracing::info!(order_id = %order.id, book_id = %book.id, "Download granted");
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::identity;
    use crate::domain::entity::order::{Order, OrderStatus};
    use crate::infra::memory::InMemoryOrderRepository;
    use catalog::infra::memory::{InMemoryBookRepository, InMemoryObjectStorage, sample_book};
    use kernel::error::kind::ErrorKind;
    use kernel::identity::Role;

    type UseCase =
        DownloadBookUseCase<InMemoryOrderRepository, InMemoryBookRepository, InMemoryObjectStorage>;

    fn setup(status: OrderStatus) -> (UseCase, Identity, Order, String) {
        let owner = identity(Role::Customer);
        let book = sample_book("Euclid", "E.", 4000);
        let books = Arc::new(InMemoryBookRepository::new());
        books.insert(book.clone());

        let mut order = Order::place(owner.id, book.id, 4000, "pi_1".into());
        order.status = status;
        let orders = Arc::new(InMemoryOrderRepository::new());
        orders.insert(order.clone());

        let uc = DownloadBookUseCase::new(
            orders,
            books,
            Arc::new(InMemoryObjectStorage::new()),
            ShopConfig::default(),
        );
        (uc, owner, order, book.content_bucket_key)
    }

    #[tokio::test]
    async fn test_paid_order_yields_content_link() {
        let (uc, owner, order, content_key) = setup(OrderStatus::Paid);
        let url = uc.execute(&owner, order.id).await.unwrap();
        assert!(url.contains(&content_key));
        assert!(url.contains("X-Amz-Expires=600"));
    }

    #[tokio::test]
    async fn test_unpaid_orders_are_refused() {
        for status in [OrderStatus::Pending, OrderStatus::Cancelled] {
            let (uc, owner, order, _) = setup(status);
            let err = uc.execute(&owner, order.id).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::OrderNotPaid);
        }
    }

    #[tokio::test]
    async fn test_visibility_is_checked_before_payment() {
        let (uc, _, order, _) = setup(OrderStatus::Pending);
        let err = uc
            .execute(&identity(Role::Customer), order.id)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EntityNotFound);
    }
}
