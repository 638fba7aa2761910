//! Application Layer
//!
//! Use cases of the catalog.

pub mod config;
pub mod create_book;
pub mod delete_book;
pub mod get_book;
pub mod list_books;
pub mod update_book;
pub mod view;

// Re-exports
pub use config::CatalogConfig;
pub use create_book::{CreateBookInput, CreateBookUseCase, Upload};
pub use delete_book::DeleteBookUseCase;
pub use get_book::GetBookUseCase;
pub use list_books::{ListBooksInput, ListBooksUseCase};
pub use update_book::{UpdateBookInput, UpdateBookUseCase};
pub use view::BookView;
