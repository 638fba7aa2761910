//! Auth Router

use axum::{Router, routing::post};

use crate::domain::repository::UserRepository;
use crate::domain::service::PasswordResetMailer;
use crate::presentation::handlers::{self, AuthAppState};

/// Public auth routes: `/register`, `/login`, `/password-reset`
pub fn auth_router<U, M>(state: AuthAppState<U, M>) -> Router
where
    U: UserRepository + Send + Sync + 'static,
    M: PasswordResetMailer + Send + Sync + 'static,
{
    Router::new()
        .route("/register", post(handlers::register::<U, M>))
        .route("/login", post(handlers::login::<U, M>))
        .route("/password-reset", post(handlers::password_reset::<U, M>))
        .with_state(state)
}
