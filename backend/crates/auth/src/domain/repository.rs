//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::error::app_error::AppResult;
use kernel::id::UserId;

use crate::domain::entity::user::User;
use crate::domain::value_object::email::Email;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a new user
    ///
    /// A taken email is `DuplicateKey { key: "email" }`.
    async fn save(&self, user: &User) -> AppResult<()>;

    /// Persist changes to an existing user
    async fn update(&self, user: &User) -> AppResult<()>;

    /// Exact (case-sensitive) email lookup
    async fn find_by_email(&self, email: &Email) -> AppResult<Option<User>>;

    /// Find user by ID
    async fn find_by_id(&self, id: &UserId) -> AppResult<Option<User>>;
}
