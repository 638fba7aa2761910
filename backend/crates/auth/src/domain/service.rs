//! Service capabilities used by the auth use cases
//!
//! Declared here so that use cases and tests can swap implementations.

use kernel::error::app_error::AppResult;
use kernel::identity::Identity;

use crate::domain::entity::user::User;
use crate::domain::value_object::email::Email;
use crate::domain::value_object::user_password::{PasswordHash, RawPassword};

/// Adaptive password hashing
#[trait_variant::make(PasswordHasher: Send)]
pub trait LocalPasswordHasher {
    /// Salted hash; two calls with the same input differ
    async fn hash(&self, password: &RawPassword) -> AppResult<PasswordHash>;

    /// `WrongPassword` on mismatch
    async fn verify(&self, hash: &PasswordHash, password: &RawPassword) -> AppResult<()>;
}

/// Bearer token minting and verification
pub trait TokenService: Send + Sync + 'static {
    fn generate(&self, user: &User) -> AppResult<String>;

    /// `Unauthorized` for any invalid, tampered or expired token
    fn extract_user(&self, token: &str) -> AppResult<Identity>;
}

/// Source of replacement passwords for the reset flow
pub trait PasswordGenerator: Send + Sync {
    fn generate(&self) -> RawPassword;
}

#[trait_variant::make(PasswordResetMailer: Send)]
pub trait LocalPasswordResetMailer {
    async fn send_password_reset(
        &self,
        to: &Email,
        first_name: &str,
        new_password: &RawPassword,
    ) -> AppResult<()>;
}
