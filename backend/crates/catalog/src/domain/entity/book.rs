//! Book Entity

use chrono::{DateTime, NaiveDate, Utc};
use kernel::id::BookId;

use crate::domain::value_object::{
    bounded_text::{AuthorName, Title},
    price::Price,
};

/// Book entity
///
/// Owns two object storage keys; both objects exist when the row is written.
#[derive(Debug, Clone)]
pub struct Book {
    pub id: BookId,
    pub title: Title,
    pub description: String,
    pub author_name: AuthorName,
    pub price: Price,
    pub release_date: NaiveDate,
    pub poster_image_bucket_key: String,
    pub content_bucket_key: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields of a new book
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: Title,
    pub description: String,
    pub author_name: AuthorName,
    pub price: Price,
    pub release_date: NaiveDate,
}

/// Partial update of the mutable fields
#[derive(Debug, Clone, Default)]
pub struct BookPatch {
    pub title: Option<Title>,
    pub description: Option<String>,
    pub author_name: Option<AuthorName>,
}

impl BookPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.author_name.is_none()
    }
}

impl Book {
    pub fn new(
        id: BookId,
        fields: NewBook,
        poster_image_bucket_key: String,
        content_bucket_key: String,
    ) -> Self {
        let now = Utc::now();

        Self {
            id,
            title: fields.title,
            description: fields.description,
            author_name: fields.author_name,
            price: fields.price,
            release_date: fields.release_date,
            poster_image_bucket_key,
            content_bucket_key,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a patch; price, release date and assets are left alone
    pub fn apply(&mut self, patch: BookPatch) {
        if patch.is_empty() {
            return;
        }
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(author_name) = patch.author_name {
            self.author_name = author_name;
        }
        self.updated_at = Utc::now();
    }
}

/// Listing filter
///
/// Each present field is a case-insensitive substring match; fields combine
/// with AND. Blank strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    pub title: Option<String>,
    pub author_name: Option<String>,
    pub description: Option<String>,
}

impl BookFilter {
    pub fn new(
        title: Option<String>,
        author_name: Option<String>,
        description: Option<String>,
    ) -> Self {
        fn clean(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            title: clean(title),
            author_name: clean(author_name),
            description: clean(description),
        }
    }

    /// In-memory evaluation of the same predicate the SQL query applies
    pub fn matches(&self, book: &Book) -> bool {
        fn contains(haystack: &str, needle: &Option<String>) -> bool {
            match needle {
                Some(n) => haystack.to_lowercase().contains(&n.to_lowercase()),
                None => true,
            }
        }

        contains(book.title.as_str(), &self.title)
            && contains(book.author_name.as_str(), &self.author_name)
            && contains(&book.description, &self.description)
    }
}
