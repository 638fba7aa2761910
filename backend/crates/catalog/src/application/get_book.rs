//! Get Book Use Case

use std::sync::Arc;

use kernel::error::app_error::{AppResult, OptionExt};
use kernel::id::BookId;

use crate::application::config::CatalogConfig;
use crate::application::view::BookView;
use crate::domain::repository::BookRepository;
use crate::domain::storage::ObjectStorage;

pub struct GetBookUseCase<R, S>
where
    R: BookRepository,
    S: ObjectStorage,
{
    books: Arc<R>,
    storage: Arc<S>,
    config: CatalogConfig,
}

impl<R, S> GetBookUseCase<R, S>
where
    R: BookRepository,
    S: ObjectStorage,
{
    pub fn new(books: Arc<R>, storage: Arc<S>, config: CatalogConfig) -> Self {
        Self {
            books,
            storage,
            config,
        }
    }

    pub async fn execute(&self, id: BookId) -> AppResult<BookView> {
        let book = self
            .books
            .find_by_id(&id)
            .await?
            .ok_or_not_found("Book", "no book with this id")?;

        BookView::present(self.storage.as_ref(), book, self.config.presign_ttl).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::{InMemoryBookRepository, InMemoryObjectStorage, sample_book};
    use kernel::error::kind::ErrorKind;

    #[tokio::test]
    async fn test_get_presigns_poster() {
        let books = Arc::new(InMemoryBookRepository::new());
        let book = sample_book("Euclid", "E.", 4000);
        books.insert(book.clone());

        let uc = GetBookUseCase::new(
            books,
            Arc::new(InMemoryObjectStorage::new()),
            CatalogConfig::default(),
        );
        let view = uc.execute(book.id).await.unwrap();
        assert_eq!(view.book.id, book.id);
        assert!(view.poster_image_link.contains(&book.poster_image_bucket_key));
    }

    #[tokio::test]
    async fn test_unknown_book() {
        let uc = GetBookUseCase::new(
            Arc::new(InMemoryBookRepository::new()),
            Arc::new(InMemoryObjectStorage::new()),
            CatalogConfig::default(),
        );
        let err = uc.execute(BookId::new()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EntityNotFound);
        assert_eq!(err.subject(), "Book");
    }
}
