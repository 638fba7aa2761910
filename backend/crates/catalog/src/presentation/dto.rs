//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, NaiveDate, Utc};
use kernel::id::BookId;
use serde::{Deserialize, Serialize};

use crate::application::view::BookView;

// ============================================================================
// List
// ============================================================================

/// `GET /books` query string
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBooksQuery {
    pub title: Option<String>,
    pub author_name: Option<String>,
    pub description: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

// ============================================================================
// Update
// ============================================================================

/// `PATCH /books/{id}` body; unknown fields are ignored
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub author_name: Option<String>,
}

// ============================================================================
// Book
// ============================================================================

/// Book as seen by clients; bucket keys are replaced by a poster link
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookResponse {
    pub id: BookId,
    pub title: String,
    pub description: String,
    pub author_name: String,
    pub price: i64,
    pub release_date: NaiveDate,
    pub poster_image_link: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BookView> for BookResponse {
    fn from(view: BookView) -> Self {
        let book = view.book;
        Self {
            id: book.id,
            title: book.title.as_str().to_string(),
            description: book.description,
            author_name: book.author_name.as_str().to_string(),
            price: book.price.minor_units(),
            release_date: book.release_date,
            poster_image_link: view.poster_image_link,
            created_at: book.created_at,
            updated_at: book.updated_at,
        }
    }
}
