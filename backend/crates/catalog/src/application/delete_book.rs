//! Delete Book Use Case
//!
//! The row goes first. The two objects are then removed best effort: a
//! storage failure is logged and the deletion still succeeds.

use std::sync::Arc;

use kernel::error::app_error::{AppResult, OptionExt};
use kernel::id::BookId;

use crate::domain::repository::BookRepository;
use crate::domain::storage::ObjectStorage;

pub struct DeleteBookUseCase<R, S>
where
    R: BookRepository,
    S: ObjectStorage,
{
    books: Arc<R>,
    storage: Arc<S>,
}

impl<R, S> DeleteBookUseCase<R, S>
where
    R: BookRepository,
    S: ObjectStorage,
{
    pub fn new(books: Arc<R>, storage: Arc<S>) -> Self {
        Self { books, storage }
    }

    pub async fn execute(&self, id: BookId) -> AppResult<()> {
        let book = self
            .books
            .find_by_id(&id)
            .await?
            .ok_or_not_found("Book", "no book with this id")?;

        self.books.delete(&book.id).await?;
        tracing::info!(book_id = %book.id, "Book deleted");

        for key in [&book.poster_image_bucket_key, &book.content_bucket_key] {
            if let Err(e) = self.storage.delete(key).await {
                tracing::warn!(book_id = %book.id, key = %key, error = %e, "Object left behind");
            }
        }

        Ok(())
    }
}
