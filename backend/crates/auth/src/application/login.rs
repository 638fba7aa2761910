//! Login Use Case
//!
//! Verifies e-mail + password and issues a bearer token.

use std::sync::Arc;

use kernel::error::app_error::{AppResult, OptionExt};

use crate::domain::repository::UserRepository;
use crate::domain::service::{PasswordHasher, TokenService};
use crate::domain::value_object::{email::Email, user_password::RawPassword};

/// Login input
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Login use case
pub struct LoginUseCase<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher,
    T: TokenService,
{
    user_repo: Arc<U>,
    hasher: Arc<H>,
    tokens: Arc<T>,
}

impl<U, H, T> LoginUseCase<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher,
    T: TokenService,
{
    pub fn new(user_repo: Arc<U>, hasher: Arc<H>, tokens: Arc<T>) -> Self {
        Self {
            user_repo,
            hasher,
            tokens,
        }
    }

    pub async fn execute(&self, input: LoginInput) -> AppResult<String> {
        let email = Email::new(input.email)?;
        let password = RawPassword::for_login(input.password)?;

        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or_not_found("User", "no user with this email")?;

        if let Err(err) = self.hasher.verify(&user.password_hash, &password).await {
            tracing::info!(user_id = %user.id, "Login rejected");
            return Err(err);
        }

        let token = self.tokens.generate(&user)?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(token)
    }
}
