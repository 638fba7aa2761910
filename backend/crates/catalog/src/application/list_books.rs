//! List Books Use Case

use std::sync::Arc;

use kernel::error::app_error::AppResult;
use kernel::pagination::{Page, PageRequest};

use crate::application::config::CatalogConfig;
use crate::application::view::BookView;
use crate::domain::entity::book::BookFilter;
use crate::domain::repository::BookRepository;
use crate::domain::storage::ObjectStorage;

#[derive(Debug, Clone, Default)]
pub struct ListBooksInput {
    pub filter: BookFilter,
    pub page: PageRequest,
}

pub struct ListBooksUseCase<R, S>
where
    R: BookRepository,
    S: ObjectStorage,
{
    books: Arc<R>,
    storage: Arc<S>,
    config: CatalogConfig,
}

impl<R, S> ListBooksUseCase<R, S>
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

    pub async fn execute(&self, input: ListBooksInput) -> AppResult<Page<BookView>> {
        let ttl = self.config.presign_ttl;

        let mut page = self.books.list(&input.filter, input.page).await?;

        let mut views = Vec::with_capacity(page.items.len());
        for book in std::mem::take(&mut page.items) {
            views.push(BookView::present(self.storage.as_ref(), book, ttl).await?);
        }

        Ok(page.with_items(views))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::{InMemoryBookRepository, InMemoryObjectStorage, sample_book};
    use chrono::{Duration, Utc};
    use kernel::id::BookId;
    use uuid::Uuid;

    fn use_case(
        books: Arc<InMemoryBookRepository>,
    ) -> ListBooksUseCase<InMemoryBookRepository, InMemoryObjectStorage> {
        ListBooksUseCase::new(
            books,
            Arc::new(InMemoryObjectStorage::new()),
            CatalogConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_filter_and_page() {
        let books = Arc::new(InMemoryBookRepository::new());
        for i in 0..12 {
            books.insert(sample_book(&format!("Euclid vol. {i}"), "E.", 100));
        }
        books.insert(sample_book("Principia", "Newton", 100));

        let out = use_case(books)
            .execute(ListBooksInput {
                filter: BookFilter::new(Some("eucl".into()), None, None),
                page: PageRequest::new(Some(2), Some(5)),
            })
            .await
            .unwrap();

        assert_eq!(out.total_items, 12);
        assert_eq!(out.total_pages, 3);
        assert_eq!(out.current_page, 2);
        assert_eq!(out.items.len(), 5);
        assert!(out.items.iter().all(|v| v.book.title.as_str().starts_with("Euclid")));
        assert!(out.items.iter().all(|v| !v.poster_image_link.is_empty()));
    }

    #[tokio::test]
    async fn test_newest_first_ties_by_id() {
        let books = Arc::new(InMemoryBookRepository::new());
        let now = Utc::now();
        for (title, hours_ago, id) in [
            ("Tie b", 1, 0x20),
            ("Oldest", 2, 0x01),
            ("Tie c", 1, 0x30),
            ("Newest", 0, 0x50),
            ("Tie a", 1, 0x10),
        ] {
            let mut book = sample_book(title, "A.", 100);
            book.id = BookId::from_uuid(Uuid::from_u128(id));
            book.created_at = now - Duration::hours(hours_ago);
            books.insert(book);
        }
        let uc = use_case(books);

        let mut titles = Vec::new();
        for page in 1..=3 {
            let out = uc
                .execute(ListBooksInput {
                    filter: BookFilter::default(),
                    page: PageRequest::new(Some(page), Some(2)),
                })
                .await
                .unwrap();
            assert_eq!(out.total_pages, 3);
            titles.push(
                out.items
                    .iter()
                    .map(|v| v.book.title.as_str().to_string())
                    .collect::<Vec<_>>(),
            );
        }

        assert_eq!(
            titles,
            vec![
                vec!["Newest", "Tie a"],
                vec!["Tie b", "Tie c"],
                vec!["Oldest"],
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_catalog() {
        let out = use_case(Arc::new(InMemoryBookRepository::new()))
            .execute(ListBooksInput::default())
            .await
            .unwrap();
        assert_eq!(out.total_items, 0);
        assert_eq!(out.total_pages, 0);
        assert!(out.items.is_empty());
    }
}
