//! Catalog Backend Module
//!
//! Books and their two binary assets (poster image, PDF content) kept in
//! object storage. Bucket keys never leave this crate: responses carry
//! presigned links instead.
//!
//! - `domain/` - Book entity, value objects, repository and storage traits
//! - `application/` - Create/Get/List/Update/Delete use cases
//! - `infra/` - PostgreSQL and S3 implementations
//! - `presentation/` - `/books` routes

pub mod application;
pub mod domain;
pub mod infra;
pub mod presentation;

pub use application::config::CatalogConfig;
pub use infra::{PgBookRepository, S3ObjectStorage};
pub use presentation::{CatalogAppState, catalog_router};
