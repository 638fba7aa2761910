//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use kernel::error::app_error::AppResult;
use kernel::http::AppJson;
use std::sync::Arc;

use crate::application::{
    LoginInput, LoginUseCase, RegisterInput, RegisterUseCase, ResetPasswordUseCase,
};
use crate::domain::repository::UserRepository;
use crate::domain::service::PasswordResetMailer;
use crate::infra::{BcryptPasswordHasher, JwtTokenService, RandomPasswordGenerator};
use crate::presentation::dto::{
    LoginRequest, PasswordResetRequest, RegisterRequest, TokenResponse,
};

/// Shared state for auth handlers
pub struct AuthAppState<U, M>
where
    U: UserRepository + Send + Sync + 'static,
    M: PasswordResetMailer + Send + Sync + 'static,
{
    pub users: Arc<U>,
    pub mailer: Arc<M>,
    pub hasher: Arc<BcryptPasswordHasher>,
    pub tokens: Arc<JwtTokenService>,
    pub passwords: Arc<RandomPasswordGenerator>,
}

impl<U, M> Clone for AuthAppState<U, M>
where
    U: UserRepository + Send + Sync + 'static,
    M: PasswordResetMailer + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            users: self.users.clone(),
            mailer: self.mailer.clone(),
            hasher: self.hasher.clone(),
            tokens: self.tokens.clone(),
            passwords: self.passwords.clone(),
        }
    }
}

// ============================================================================
// Register
// ============================================================================

/// POST /register
pub async fn register<U, M>(
    State(state): State<AuthAppState<U, M>>,
    AppJson(req): AppJson<RegisterRequest>,
) -> AppResult<impl IntoResponse>
where
    U: UserRepository + Send + Sync + 'static,
    M: PasswordResetMailer + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(
        state.users.clone(),
        state.hasher.clone(),
        state.tokens.clone(),
    );

    let token = use_case
        .execute(RegisterInput {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            password: req.password,
            password_confirmation: req.password_confirmation,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}

// ============================================================================
// Login
// ============================================================================

/// POST /login
pub async fn login<U, M>(
    State(state): State<AuthAppState<U, M>>,
    AppJson(req): AppJson<LoginRequest>,
) -> AppResult<impl IntoResponse>
where
    U: UserRepository + Send + Sync + 'static,
    M: PasswordResetMailer + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(
        state.users.clone(),
        state.hasher.clone(),
        state.tokens.clone(),
    );

    let token = use_case
        .execute(LoginInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}

// ============================================================================
// Password Reset
// ============================================================================

/// POST /password-reset
pub async fn password_reset<U, M>(
    State(state): State<AuthAppState<U, M>>,
    AppJson(req): AppJson<PasswordResetRequest>,
) -> AppResult<StatusCode>
where
    U: UserRepository + Send + Sync + 'static,
    M: PasswordResetMailer + Send + Sync + 'static,
{
    let use_case = ResetPasswordUseCase::new(
        state.users.clone(),
        state.hasher.clone(),
        state.passwords.clone(),
        state.mailer.clone(),
    );

    use_case.execute(req.email).await?;

    Ok(StatusCode::NO_CONTENT)
}
