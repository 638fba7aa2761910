//! Domain Layer
//!
//! Contains entities, value objects, repository traits and the service
//! capabilities the use cases depend on.

pub mod entity;
pub mod repository;
pub mod service;
pub mod value_object;

// Re-exports
pub use entity::user::User;
pub use repository::UserRepository;
pub use service::{PasswordGenerator, PasswordHasher, PasswordResetMailer, TokenService};
