//! HTTP Handlers

use std::sync::Arc;

use axum::Json;
use axum::extract::multipart::{Field, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use kernel::error::app_error::{AppError, AppResult};
use kernel::http::{AppJson, AppPath, AppQuery};
use kernel::id::BookId;
use kernel::pagination::{Page, PageRequest};

use crate::application::{
    CatalogConfig, CreateBookInput, CreateBookUseCase, DeleteBookUseCase, GetBookUseCase,
    ListBooksInput, ListBooksUseCase, UpdateBookInput, UpdateBookUseCase, Upload,
};
use crate::domain::entity::book::BookFilter;
use crate::domain::repository::BookRepository;
use crate::domain::storage::ObjectStorage;
use crate::presentation::dto::{BookResponse, ListBooksQuery, UpdateBookRequest};

/// Shared state for catalog handlers
pub struct CatalogAppState<R, S>
where
    R: BookRepository + Send + Sync + 'static,
    S: ObjectStorage + Send + Sync + 'static,
{
    pub books: Arc<R>,
    pub storage: Arc<S>,
    pub config: CatalogConfig,
}

impl<R, S> Clone for CatalogAppState<R, S>
where
    R: BookRepository + Send + Sync + 'static,
    S: ObjectStorage + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            books: self.books.clone(),
            storage: self.storage.clone(),
            config: self.config.clone(),
        }
    }
}

/// A path id that is not a UUID names no book
fn parse_book_id(raw: &str) -> AppResult<BookId> {
    BookId::parse_str(raw)
        .map_err(|e| AppError::entity_not_found("Book", "malformed book id").with_source(e))
}

// ============================================================================
// List
// ============================================================================

/// GET /books
pub async fn list_books<R, S>(
    State(state): State<CatalogAppState<R, S>>,
    AppQuery(query): AppQuery<ListBooksQuery>,
) -> AppResult<Json<Page<BookResponse>>>
where
    R: BookRepository + Send + Sync + 'static,
    S: ObjectStorage + Send + Sync + 'static,
{
    let use_case = ListBooksUseCase::new(state.books, state.storage, state.config);

    let page = use_case
        .execute(ListBooksInput {
            filter: BookFilter::new(query.title, query.author_name, query.description),
            page: PageRequest::new(query.page, query.per_page),
        })
        .await?;

    Ok(Json(page.map(BookResponse::from)))
}

// ============================================================================
// Create
// ============================================================================

/// POST /books (multipart)
///
/// Text parts: `title`, `description`, `authorName`, `price`, `releaseDate`.
/// File parts: `poster` (image) and `content` (PDF). Unknown parts are skipped.
pub async fn create_book<R, S>(
    State(state): State<CatalogAppState<R, S>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<impl IntoResponse>
where
    R: BookRepository + Send + Sync + 'static,
    S: ObjectStorage + Send + Sync + 'static,
{
    let mut multipart = multipart?;
    let mut input = CreateBookInput::default();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        match name.as_str() {
            "title" => input.title = field.text().await?,
            "description" => input.description = field.text().await?,
            "authorName" => input.author_name = field.text().await?,
            "price" => input.price = field.text().await?,
            "releaseDate" => input.release_date = field.text().await?,
            "poster" => input.poster = Some(read_upload(field).await?),
            "content" => input.content = Some(read_upload(field).await?),
            other => tracing::debug!(part = other, "Ignoring unknown multipart part"),
        }
    }

    let use_case = CreateBookUseCase::new(state.books, state.storage, state.config);
    let view = use_case.execute(input).await?;

    Ok((StatusCode::CREATED, Json(BookResponse::from(view))))
}

async fn read_upload(field: Field<'_>) -> AppResult<Upload> {
    let file_name = field.file_name().map(str::to_owned);
    let content_type = field.content_type().unwrap_or_default().to_owned();
    let bytes = field.bytes().await?.to_vec();

    Ok(Upload {
        file_name,
        content_type,
        bytes,
    })
}

// ============================================================================
// Get
// ============================================================================

/// GET /books/{id}
pub async fn get_book<R, S>(
    State(state): State<CatalogAppState<R, S>>,
    AppPath(id): AppPath<String>,
) -> AppResult<Json<BookResponse>>
where
    R: BookRepository + Send + Sync + 'static,
    S: ObjectStorage + Send + Sync + 'static,
{
    let id = parse_book_id(&id)?;
    let use_case = GetBookUseCase::new(state.books, state.storage, state.config);

    Ok(Json(use_case.execute(id).await?.into()))
}

// ============================================================================
// Update
// ============================================================================

/// PATCH /books/{id}
pub async fn update_book<R, S>(
    State(state): State<CatalogAppState<R, S>>,
    AppPath(id): AppPath<String>,
    AppJson(req): AppJson<UpdateBookRequest>,
) -> AppResult<StatusCode>
where
    R: BookRepository + Send + Sync + 'static,
    S: ObjectStorage + Send + Sync + 'static,
{
    let id = parse_book_id(&id)?;
    let use_case = UpdateBookUseCase::new(state.books);

    use_case
        .execute(
            id,
            UpdateBookInput {
                title: req.title,
                description: req.description,
                author_name: req.author_name,
            },
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Delete
// ============================================================================

/// DELETE /books/{id}
pub async fn delete_book<R, S>(
    State(state): State<CatalogAppState<R, S>>,
    AppPath(id): AppPath<String>,
) -> AppResult<StatusCode>
where
    R: BookRepository + Send + Sync + 'static,
    S: ObjectStorage + Send + Sync + 'static,
{
    let id = parse_book_id(&id)?;
    DeleteBookUseCase::new(state.books, state.storage)
        .execute(id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
