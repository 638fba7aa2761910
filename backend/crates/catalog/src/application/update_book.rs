//! Update Book Use Case
//!
//! Partial update of `title`, `description` and `authorName`. Every other
//! field of a book is immutable through the API.

use std::sync::Arc;

use kernel::error::app_error::{AppError, AppResult, OptionExt};
use kernel::id::BookId;

use crate::domain::entity::book::BookPatch;
use crate::domain::repository::BookRepository;
use crate::domain::value_object::bounded_text::{AuthorName, Title};

/// Absent fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct UpdateBookInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub author_name: Option<String>,
}

pub struct UpdateBookUseCase<R>
where
    R: BookRepository,
{
    books: Arc<R>,
}

impl<R> UpdateBookUseCase<R>
where
    R: BookRepository,
{
    pub fn new(books: Arc<R>) -> Self {
        Self { books }
    }

    pub async fn execute(&self, id: BookId, input: UpdateBookInput) -> AppResult<()> {
        let patch = validate(input)?;

        let mut book = self
            .books
            .find_by_id(&id)
            .await?
            .ok_or_not_found("Book", "no book with this id")?;

        if patch.is_empty() {
            return Ok(());
        }

        book.apply(patch);
        self.books.update(&book).await?;

        tracing::info!(book_id = %book.id, "Book updated");
        Ok(())
    }
}

fn validate(input: UpdateBookInput) -> AppResult<BookPatch> {
    let title = input.title.map(Title::new).transpose();
    let author_name = input.author_name.map(AuthorName::new).transpose();
    let description = input.description.map(|d| d.trim().to_string());
    let blank_description = description.as_deref() == Some("");

    match (title, author_name) {
        (Ok(title), Ok(author_name)) if !blank_description => Ok(BookPatch {
            title,
            description,
            author_name,
        }),
        (title, author_name) => {
            let mut violations: Vec<String> = [title.err(), author_name.err()]
                .into_iter()
                .flatten()
                .map(|err| err.to_string())
                .collect();
            if blank_description {
                violations.push("description not valid: must not be empty".to_string());
            }
            Err(AppError::not_valid(
                "UpdateBookRequest",
                format!("{} violation(s)", violations.len()),
            )
            .with_details(violations))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::{InMemoryBookRepository, sample_book};
    use kernel::error::kind::ErrorKind;

    #[tokio::test]
    async fn test_patch_updates_only_given_fields() {
        let books = Arc::new(InMemoryBookRepository::new());
        let book = sample_book("Euclid", "E.", 4000);
        books.insert(book.clone());

        UpdateBookUseCase::new(books.clone())
            .execute(
                book.id,
                UpdateBookInput {
                    author_name: Some("Euclid of Alexandria".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let stored = books.get(&book.id).unwrap();
        assert_eq!(stored.author_name.as_str(), "Euclid of Alexandria");
        assert_eq!(stored.title, book.title);
        assert_eq!(stored.description, book.description);
        assert_eq!(stored.price, book.price);
    }

    #[tokio::test]
    async fn test_invalid_title() {
        let books = Arc::new(InMemoryBookRepository::new());
        let book = sample_book("Euclid", "E.", 4000);
        books.insert(book.clone());

        let err = UpdateBookUseCase::new(books)
            .execute(
                book.id,
                UpdateBookInput {
                    title: Some("x".repeat(101)),
                    description: Some(" ".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotValid);
        assert_eq!(err.details().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_book() {
        let err = UpdateBookUseCase::new(Arc::new(InMemoryBookRepository::new()))
            .execute(BookId::new(), UpdateBookInput::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EntityNotFound);
    }
}
