//! Register Use Case
//!
//! Creates a new customer account and signs it in.

use std::sync::Arc;

use kernel::error::app_error::{AppError, AppResult};

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::service::{PasswordHasher, TokenService};
use crate::domain::value_object::{
    email::Email, person_name::PersonName, user_password::RawPassword,
};

/// Register input
pub struct RegisterInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

/// Register use case
pub struct RegisterUseCase<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher,
    T: TokenService,
{
    user_repo: Arc<U>,
    hasher: Arc<H>,
    tokens: Arc<T>,
}

impl<U, H, T> RegisterUseCase<U, H, T>
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

    /// Returns the signed token of the new user
    pub async fn execute(&self, input: RegisterInput) -> AppResult<String> {
        let confirmation_matches = input.password == input.password_confirmation;

        let first_name = PersonName::first(input.first_name);
        let last_name = PersonName::last(input.last_name);
        let email = Email::new(input.email);
        let password = RawPassword::new(input.password);

        let (first_name, last_name, email, password) = match (first_name, last_name, email, password)
        {
            (Ok(f), Ok(l), Ok(e), Ok(p)) if confirmation_matches => (f, l, e, p),
            (f, l, e, p) => {
                let mut violations: Vec<String> = [f.err(), l.err(), e.err(), p.err()]
                    .into_iter()
                    .flatten()
                    .map(|err| err.to_string())
                    .collect();
                if !confirmation_matches {
                    violations.push(
                        "passwordConfirmation not valid: must equal password".to_string(),
                    );
                }
                return Err(AppError::not_valid(
                    "RegisterRequest",
                    format!("{} violation(s)", violations.len()),
                )
                .with_details(violations));
            }
        };

        let password_hash = self.hasher.hash(&password).await?;
        drop(password);

        let user = User::register(first_name, last_name, email, password_hash);
        self.user_repo.save(&user).await?;

        let token = self.tokens.generate(&user)?;

        tracing::info!(user_id = %user.id, "User registered");

        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::jwt::JwtTokenService;
    use crate::infra::memory::InMemoryUserRepository;
    use crate::infra::password::BcryptPasswordHasher;
    use kernel::error::kind::ErrorKind;
    use kernel::identity::Role;

    fn use_case() -> (
        RegisterUseCase<InMemoryUserRepository, BcryptPasswordHasher, JwtTokenService>,
        Arc<JwtTokenService>,
    ) {
        let tokens = Arc::new(JwtTokenService::new(b"test-secret", None));
        let uc = RegisterUseCase::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(BcryptPasswordHasher::new(4)),
            tokens.clone(),
        );
        (uc, tokens)
    }

    fn ada() -> RegisterInput {
        RegisterInput {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "a@l.io".into(),
            password: "secret1".into(),
            password_confirmation: "secret1".into(),
        }
    }

    #[tokio::test]
    async fn test_register_returns_token_for_new_customer() {
        let (uc, tokens) = use_case();
        let token = uc.execute(ada()).await.unwrap();

        let identity = tokens.extract_user(&token).unwrap();
        assert_eq!(identity.email, "a@l.io");
        assert_eq!(identity.first_name, "Ada");
        assert_eq!(identity.last_name, "Lovelace");
        assert_eq!(identity.role, Role::Customer);
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let (uc, _) = use_case();
        uc.execute(ada()).await.unwrap();

        let err = uc.execute(ada()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateKey);
        assert_eq!(err.public_message(), "this email is already being used");
    }

    #[tokio::test]
    async fn test_all_violations_are_reported() {
        let (uc, _) = use_case();
        let err = uc
            .execute(RegisterInput {
                first_name: "".into(),
                last_name: "Lovelace".into(),
                email: "not-an-email".into(),
                password: "short".into(),
                password_confirmation: "other".into(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotValid);
        assert_eq!(err.details().len(), 4);
        assert!(err.details().iter().any(|d| d.starts_with("firstName")));
        assert!(err.details().iter().any(|d| d.starts_with("passwordConfirmation")));
    }

    #[tokio::test]
    async fn test_multi_word_names() {
        let (uc, tokens) = use_case();

        let mut input = ada();
        input.first_name = "Augusta Ada".into();
        let err = uc.execute(input).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotValid);
        assert_eq!(
            err.details(),
            ["firstName not valid: must not contain spaces".to_string()]
        );

        let mut input = ada();
        input.last_name = "King Lovelace".into();
        let token = uc.execute(input).await.unwrap();
        let identity = tokens.extract_user(&token).unwrap();
        assert_eq!(identity.first_name, "Ada");
        assert_eq!(identity.last_name, "King Lovelace");
    }

    #[tokio::test]
    async fn test_password_length_boundaries() {
        let (uc, _) = use_case();
        let mut input = ada();
        input.password = "x".repeat(21);
        input.password_confirmation = input.password.clone();
        assert_eq!(
            uc.execute(input).await.unwrap_err().kind(),
            ErrorKind::NotValid
        );
    }
}
