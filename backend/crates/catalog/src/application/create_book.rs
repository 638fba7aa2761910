//! Create Book Use Case
//!
//! Validates the metadata and both uploads, stores the two objects under
//! fresh keys and then writes the row. When any step after the first upload
//! fails, the objects written so far are removed again (best effort).

use std::sync::Arc;

use chrono::NaiveDate;
use kernel::error::app_error::{AppError, AppResult};
use kernel::id::BookId;
use uuid::Uuid;

use crate::application::config::CatalogConfig;
use crate::application::view::BookView;
use crate::domain::entity::book::{Book, NewBook};
use crate::domain::repository::BookRepository;
use crate::domain::storage::ObjectStorage;
use crate::domain::value_object::{
    bounded_text::{AuthorName, Title},
    price::Price,
};

const PDF_CONTENT_TYPE: &str = "application/pdf";

/// One uploaded file
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: Option<String>,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Raw multipart fields; everything is validated here
#[derive(Debug, Clone, Default)]
pub struct CreateBookInput {
    pub title: String,
    pub description: String,
    pub author_name: String,
    pub price: String,
    pub release_date: String,
    pub poster: Option<Upload>,
    pub content: Option<Upload>,
}

pub struct CreateBookUseCase<R, S>
where
    R: BookRepository,
    S: ObjectStorage,
{
    books: Arc<R>,
    storage: Arc<S>,
    config: CatalogConfig,
}

impl<R, S> CreateBookUseCase<R, S>
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

    pub async fn execute(&self, input: CreateBookInput) -> AppResult<BookView> {
        let (fields, poster, content) = validate(input)?;

        let id = BookId::new();
        let poster_key = format!("posters/{}.{}", Uuid::new_v4(), image_extension(&poster));
        let content_key = format!("contents/{}.pdf", Uuid::new_v4());

        self.storage
            .put(&poster_key, poster.bytes, &poster.content_type)
            .await?;

        if let Err(e) = self
            .storage
            .put(&content_key, content.bytes, &content.content_type)
            .await
        {
            self.discard(&[poster_key.as_str()]).await;
            return Err(e);
        }

        let book = Book::new(id, fields, poster_key, content_key);
        if let Err(e) = self.books.save(&book).await {
            self.discard(&[
                book.poster_image_bucket_key.as_str(),
                book.content_bucket_key.as_str(),
            ])
            .await;
            return Err(e);
        }

        tracing::info!(book_id = %book.id, title = %book.title.as_str(), "Book created");

        BookView::present(self.storage.as_ref(), book, self.config.presign_ttl).await
    }

    async fn discard(&self, keys: &[&str]) {
        for key in keys {
            if let Err(e) = self.storage.delete(key).await {
                tracing::warn!(key, error = %e, "Could not remove orphaned object");
            }
        }
    }
}

fn validate(input: CreateBookInput) -> AppResult<(NewBook, Upload, Upload)> {
    let title = Title::new(input.title);
    let author_name = AuthorName::new(input.author_name);
    let price = Price::parse(&input.price);
    let release_date = parse_release_date(&input.release_date);
    let description = input.description.trim().to_string();

    let mut violations = Vec::new();
    if description.is_empty() {
        violations.push("description not valid: must not be empty".to_string());
    }

    let poster = match input.poster {
        Some(p) if p.content_type.starts_with("image/") && !p.bytes.is_empty() => Some(p),
        Some(_) => {
            violations.push("poster not valid: must be a non-empty image".to_string());
            None
        }
        None => {
            violations.push("poster not valid: part is missing".to_string());
            None
        }
    };
    let content = match input.content {
        Some(c) if c.content_type == PDF_CONTENT_TYPE && !c.bytes.is_empty() => Some(c),
        Some(_) => {
            violations.push("content not valid: must be a non-empty PDF".to_string());
            None
        }
        None => {
            violations.push("content not valid: part is missing".to_string());
            None
        }
    };

    match (title, author_name, price, release_date, poster, content) {
        (Ok(title), Ok(author_name), Ok(price), Ok(release_date), Some(poster), Some(content))
            if violations.is_empty() =>
        {
            Ok((
                NewBook {
                    title,
                    description,
                    author_name,
                    price,
                    release_date,
                },
                poster,
                content,
            ))
        }
        (title, author_name, price, release_date, _, _) => {
            let mut all: Vec<String> = [
                title.err(),
                author_name.err(),
                price.err(),
                release_date.err(),
            ]
            .into_iter()
            .flatten()
            .map(|err| err.to_string())
            .collect();
            all.extend(violations);
            Err(AppError::not_valid(
                "CreateBookRequest",
                format!("{} violation(s)", all.len()),
            )
            .with_details(all))
        }
    }
}

fn parse_release_date(raw: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::not_valid("releaseDate", "must be a date formatted YYYY-MM-DD"))
}

/// `image/png` -> `png`; falls back to the file name, then to `img`
fn image_extension(upload: &Upload) -> String {
    let from_type = upload
        .content_type
        .strip_prefix("image/")
        .map(|sub| sub.split(['+', ';']).next().unwrap_or(sub).trim())
        .filter(|sub| !sub.is_empty() && sub.chars().all(|c| c.is_ascii_alphanumeric()));

    let ext = match from_type {
        Some("jpeg") => Some("jpg".to_string()),
        Some(sub) => Some(sub.to_ascii_lowercase()),
        None => upload
            .file_name
            .as_deref()
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric())),
    };

    ext.unwrap_or_else(|| "img".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::{InMemoryBookRepository, InMemoryObjectStorage};
    use kernel::error::kind::ErrorKind;

    fn png() -> Upload {
        Upload {
            file_name: Some("cover.png".into()),
            content_type: "image/png".into(),
            bytes: vec![0x89, b'P', b'N', b'G'],
        }
    }

    fn pdf() -> Upload {
        Upload {
            file_name: Some("book.pdf".into()),
            content_type: "application/pdf".into(),
            bytes: b"%PDF-1.7".to_vec(),
        }
    }

    fn euclid() -> CreateBookInput {
        CreateBookInput {
            title: "Euclid".into(),
            description: "Elements".into(),
            author_name: "E.".into(),
            price: "4000".into(),
            release_date: "2020-01-01".into(),
            poster: Some(png()),
            content: Some(pdf()),
        }
    }

    fn use_case(
        books: Arc<InMemoryBookRepository>,
        storage: Arc<InMemoryObjectStorage>,
    ) -> CreateBookUseCase<InMemoryBookRepository, InMemoryObjectStorage> {
        CreateBookUseCase::new(books, storage, CatalogConfig::default())
    }

    #[tokio::test]
    async fn test_create_stores_objects_and_row() {
        let books = Arc::new(InMemoryBookRepository::new());
        let storage = Arc::new(InMemoryObjectStorage::new());

        let view = use_case(books.clone(), storage.clone())
            .execute(euclid())
            .await
            .unwrap();

        assert!(view.book.poster_image_bucket_key.starts_with("posters/"));
        assert!(view.book.poster_image_bucket_key.ends_with(".png"));
        assert!(view.book.content_bucket_key.starts_with("contents/"));
        assert!(view.poster_image_link.starts_with("https://"));
        assert!(storage.contains(&view.book.poster_image_bucket_key));
        assert!(storage.contains(&view.book.content_bucket_key));
        assert_eq!(books.len(), 1);
        assert_eq!(view.book.price.minor_units(), 4000);
    }

    #[tokio::test]
    async fn test_every_violation_is_reported() {
        let books = Arc::new(InMemoryBookRepository::new());
        let storage = Arc::new(InMemoryObjectStorage::new());

        let err = use_case(books.clone(), storage.clone())
            .execute(CreateBookInput {
                title: "".into(),
                price: "-3".into(),
                release_date: "yesterday".into(),
                poster: Some(pdf()),
                ..euclid()
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotValid);
        assert_eq!(err.details().len(), 4);
        assert!(err.details().iter().any(|d| d.starts_with("poster")));
        assert!(books.is_empty());
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_missing_parts() {
        let uc = use_case(
            Arc::new(InMemoryBookRepository::new()),
            Arc::new(InMemoryObjectStorage::new()),
        );
        let err = uc
            .execute(CreateBookInput {
                poster: None,
                content: None,
                ..euclid()
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotValid);
        assert_eq!(err.details().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_upload_removes_poster() {
        let storage = Arc::new(InMemoryObjectStorage::failing_on("contents/"));
        let err = use_case(Arc::new(InMemoryBookRepository::new()), storage.clone())
            .execute(euclid())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(storage.is_empty());
    }

    #[test]
    fn test_image_extension() {
        let mut upload = png();
        assert_eq!(image_extension(&upload), "png");
        upload.content_type = "image/jpeg".into();
        assert_eq!(image_extension(&upload), "jpg");
        upload.content_type = "image/svg+xml".into();
        assert_eq!(image_extension(&upload), "svg");
        upload.content_type = "image/".into();
        assert_eq!(image_extension(&upload), "png");
        upload.file_name = None;
        assert_eq!(image_extension(&upload), "img");
    }
}
