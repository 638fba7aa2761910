//! PostgreSQL Repository Implementations

use chrono::{DateTime, NaiveDate, Utc};
use kernel::error::app_error::{AppError, AppResult};
use kernel::id::BookId;
use kernel::pagination::{Page, PageRequest};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::domain::entity::book::{Book, BookFilter};
use crate::domain::repository::BookRepository;
use crate::domain::value_object::{
    bounded_text::{AuthorName, Title},
    price::Price,
};

const BOOK_COLUMNS: &str = r#"
    id,
    title,
    description,
    author_name,
    price,
    release_date,
    poster_image_bucket_key,
    content_bucket_key,
    created_at,
    updated_at
"#;

/// PostgreSQL-backed book repository
#[derive(Clone)]
pub struct PgBookRepository {
    pool: PgPool,
}

impl PgBookRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Book Repository Implementation
// ============================================================================

impl BookRepository for PgBookRepository {
    async fn save(&self, book: &Book) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO books (
                id,
                title,
                description,
                author_name,
                price,
                release_date,
                poster_image_bucket_key,
                content_bucket_key,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(book.id.as_uuid())
        .bind(book.title.as_str())
        .bind(&book.description)
        .bind(book.author_name.as_str())
        .bind(book.price.minor_units())
        .bind(book.release_date)
        .bind(&book.poster_image_bucket_key)
        .bind(&book.content_bucket_key)
        .bind(book.created_at)
        .bind(book.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(&self, book: &Book) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE books SET
                title = $2,
                description = $3,
                author_name = $4,
                updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(book.id.as_uuid())
        .bind(book.title.as_str())
        .bind(&book.description)
        .bind(book.author_name.as_str())
        .bind(book.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::entity_not_found("Book", "no row to update"));
        }

        Ok(())
    }

    async fn delete(&self, id: &BookId) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::entity_not_found("Book", "no row to delete"));
        }

        Ok(())
    }

    async fn find_by_id(&self, id: &BookId) -> AppResult<Option<Book>> {
        let row = sqlx::query_as::<_, BookRow>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(BookRow::into_book))
    }

    async fn list(&self, filter: &BookFilter, page: PageRequest) -> AppResult<Page<Book>> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM books WHERE TRUE");
        push_filter(&mut count, filter);
        let total: i64 = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Postgres>::new(format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE TRUE"
        ));
        push_filter(&mut select, filter);
        push_page(&mut select, page);

        let rows = select
            .build_query_as::<BookRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(Page::new(
            page,
            total.max(0) as u64,
            rows.into_iter().map(BookRow::into_book).collect(),
        ))
    }
}

/// Case-insensitive substring match per present field
fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &BookFilter) {
    let fields = [
        ("title", &filter.title),
        ("author_name", &filter.author_name),
        ("description", &filter.description),
    ];
    for (column, value) in fields {
        if let Some(value) = value {
            builder
                .push(format!(" AND {column} ILIKE "))
                .push_bind(contains_pattern(value));
        }
    }
}

/// Newest first; ties broken by id so that pages never overlap
fn push_page(builder: &mut QueryBuilder<'_, Postgres>, page: PageRequest) {
    builder
        .push(" ORDER BY created_at DESC, id ASC LIMIT ")
        .push_bind(page.limit())
        .push(" OFFSET ")
        .push_bind(page.offset());
}

/// `%value%` with LIKE wildcards in `value` taken literally
fn contains_pattern(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('%');
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct BookRow {
    id: Uuid,
    title: String,
    description: String,
    author_name: String,
    price: i64,
    release_date: NaiveDate,
    poster_image_bucket_key: String,
    content_bucket_key: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl BookRow {
    fn into_book(self) -> Book {
        Book {
            id: BookId::from_uuid(self.id),
            title: Title::from_db(self.title),
            description: self.description,
            author_name: AuthorName::from_db(self.author_name),
            price: Price::from_db(self.price),
            release_date: self.release_date,
            poster_image_bucket_key: self.poster_image_bucket_key,
            content_bucket_key: self.content_bucket_key,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
