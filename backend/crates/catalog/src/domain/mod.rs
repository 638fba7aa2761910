//! Domain Layer

pub mod entity;
pub mod repository;
pub mod storage;
pub mod value_object;

pub use entity::book::{Book, BookFilter, BookPatch, NewBook};
pub use repository::BookRepository;
pub use storage::ObjectStorage;
