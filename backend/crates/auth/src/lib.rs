//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository and service traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database, JWT, bcrypt and e-mail implementations
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Features
//! - Registration and login with email + password, answered with a JWT
//! - Password reset by e-mail (random 8-character replacement)
//! - Bearer-token middleware injecting the caller's identity
//!
//! ## Security Model
//! - Passwords hashed with bcrypt (work factor 12)
//! - HS256-signed tokens carrying `{id, email, name, admin}`
//! - Admins are recognised from the `admin` claim; see `kernel::http::require_admin`

pub mod application;
pub mod domain;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use domain::service::TokenService;
pub use infra::{
    BcryptPasswordHasher, JwtTokenService, PgUserRepository, RandomPasswordGenerator,
    SesPasswordResetMailer,
};
pub use presentation::{AuthAppState, auth_router, authenticate};
