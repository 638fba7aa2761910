//! Infrastructure Layer
//!
//! PostgreSQL persistence and the S3-backed object storage.

#[cfg(any(test, feature = "testing"))]
pub mod memory;
pub mod postgres;
pub mod s3;

pub use postgres::PgBookRepository;
pub use s3::S3ObjectStorage;
