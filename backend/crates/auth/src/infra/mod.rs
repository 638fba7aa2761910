//! Infrastructure Layer
//!
//! Database implementations and external service integrations.

pub mod jwt;
pub mod mailer;
#[cfg(any(test, feature = "testing"))]
pub mod memory;
pub mod password;
pub mod postgres;

pub use jwt::JwtTokenService;
pub use mailer::SesPasswordResetMailer;
pub use password::{BcryptPasswordHasher, RandomPasswordGenerator};
pub use postgres::PgUserRepository;
