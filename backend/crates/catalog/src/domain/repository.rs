//! Repository Traits

use kernel::error::app_error::AppResult;
use kernel::id::BookId;
use kernel::pagination::{Page, PageRequest};

use crate::domain::entity::book::{Book, BookFilter};

/// Book repository trait
#[trait_variant::make(BookRepository: Send)]
pub trait LocalBookRepository {
    async fn save(&self, book: &Book) -> AppResult<()>;

    /// `EntityNotFound` when the row is gone
    async fn update(&self, book: &Book) -> AppResult<()>;

    /// `EntityNotFound` when the row is gone
    async fn delete(&self, id: &BookId) -> AppResult<()>;

    async fn find_by_id(&self, id: &BookId) -> AppResult<Option<Book>>;

    /// Ordered by `created_at` descending, then `id` ascending
    async fn list(&self, filter: &BookFilter, page: PageRequest) -> AppResult<Page<Book>>;
}
