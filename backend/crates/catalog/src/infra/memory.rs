//! In-memory doubles for tests

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::NaiveDate;
use kernel::error::app_error::{AppError, AppResult};
use kernel::id::BookId;
use kernel::pagination::{Page, PageRequest, paginate};
use uuid::Uuid;

use crate::domain::entity::book::{Book, BookFilter, NewBook};
use crate::domain::repository::BookRepository;
use crate::domain::storage::ObjectStorage;
use crate::domain::value_object::{
    bounded_text::{AuthorName, Title},
    price::Price,
};

/// A valid book whose asset keys are unique
pub fn sample_book(title: &str, author_name: &str, price: i64) -> Book {
    Book::new(
        BookId::new(),
        NewBook {
            title: Title::from_db(title.to_string()),
            description: format!("About {title}"),
            author_name: AuthorName::from_db(author_name.to_string()),
            price: Price::from_db(price),
            release_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default(),
        },
        format!("posters/{}.png", Uuid::new_v4()),
        format!("contents/{}.pdf", Uuid::new_v4()),
    )
}

// ============================================================================
// Books
// ============================================================================

/// [`BookRepository`] over a map, ordered like the SQL implementation
#[derive(Debug, Default)]
pub struct InMemoryBookRepository {
    books: Mutex<HashMap<BookId, Book>>,
}

impl InMemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, book: Book) {
        self.lock().insert(book.id, book);
    }

    pub fn get(&self, id: &BookId) -> Option<Book> {
        self.lock().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<BookId, Book>> {
        self.books.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl BookRepository for InMemoryBookRepository {
    async fn save(&self, book: &Book) -> AppResult<()> {
        self.insert(book.clone());
        Ok(())
    }

    async fn update(&self, book: &Book) -> AppResult<()> {
        match self.lock().get_mut(&book.id) {
            Some(slot) => {
                *slot = book.clone();
                Ok(())
            }
            None => Err(AppError::entity_not_found("Book", "no row to update")),
        }
    }

    async fn delete(&self, id: &BookId) -> AppResult<()> {
        self.lock()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| AppError::entity_not_found("Book", "no row to delete"))
    }

    async fn find_by_id(&self, id: &BookId) -> AppResult<Option<Book>> {
        Ok(self.get(id))
    }

    async fn list(&self, filter: &BookFilter, page: PageRequest) -> AppResult<Page<Book>> {
        let mut matching: Vec<Book> = self
            .lock()
            .values()
            .filter(|b| filter.matches(b))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(paginate(&matching, page))
    }
}

// ============================================================================
// Object storage
// ============================================================================

/// Presigned links of this double point at this host
pub const FAKE_STORAGE_ORIGIN: &str = "https://storage.test";

/// [`ObjectStorage`] keeping objects in memory
#[derive(Debug, Default)]
pub struct InMemoryObjectStorage {
    objects: Mutex<HashMap<String, (String, Vec<u8>)>>,
    fail_prefix: Option<String>,
}

impl InMemoryObjectStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes and deletes of keys starting with `prefix` fail
    pub fn failing_on(prefix: impl Into<String>) -> Self {
        Self {
            fail_prefix: Some(prefix.into()),
            ..Self::default()
        }
    }

    /// Place an empty object under `key`
    pub fn seed(&self, key: &str) {
        self.lock()
            .insert(key.to_string(), ("application/octet-stream".into(), Vec::new()));
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    /// Content type of a stored object
    pub fn content_type(&self, key: &str) -> Option<String> {
        self.lock().get(key).map(|(ct, _)| ct.clone())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn check(&self, key: &str) -> AppResult<()> {
        match &self.fail_prefix {
            Some(prefix) if key.starts_with(prefix.as_str()) => {
                Err(AppError::internal("object store unavailable"))
            }
            _ => Ok(()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, (String, Vec<u8>)>> {
        self.objects.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ObjectStorage for InMemoryObjectStorage {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> AppResult<()> {
        self.check(key)?;
        self.lock()
            .insert(key.to_string(), (content_type.to_string(), bytes));
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.check(key)?;
        self.lock().remove(key);
        Ok(())
    }

    async fn presign_get(&self, key: &str, ttl: Duration) -> AppResult<String> {
        Ok(format!(
            "{FAKE_STORAGE_ORIGIN}/{key}?X-Amz-Expires={}",
            ttl.as_secs()
        ))
    }
}
