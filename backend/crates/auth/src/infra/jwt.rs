//! JWT token service (HS256)
//!
//! Claims: `{id, email, name, admin, iat, exp?}` where `name` is
//! `"<first> <last>"`. Extraction splits `name` back on its first space.

use std::time::Duration;

use chrono::Utc;
use kernel::error::app_error::{AppError, AppResult, ResultExt};
use kernel::id::UserId;
use kernel::identity::{Identity, Role};
use platform::jwt::JwtCodec;
use serde::{Deserialize, Serialize};

use crate::domain::entity::user::User;
use crate::domain::service::TokenService;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    id: UserId,
    email: String,
    name: String,
    admin: bool,
    iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exp: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct JwtTokenService {
    codec: JwtCodec,
    ttl: Option<Duration>,
}

impl JwtTokenService {
    /// `ttl = None` issues tokens without expiry
    pub fn new(secret: &[u8], ttl: Option<Duration>) -> Self {
        Self {
            codec: JwtCodec::hs256(secret),
            ttl,
        }
    }
}

impl TokenService for JwtTokenService {
    fn generate(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            id: user.id,
            email: user.email.as_str().to_string(),
            name: user.full_name(),
            admin: user.is_admin(),
            iat: now,
            exp: self.ttl.map(|ttl| now + ttl.as_secs() as i64),
        };

        self.codec.encode(&claims).or_internal("could not sign token")
    }

    fn extract_user(&self, token: &str) -> AppResult<Identity> {
        let claims: Claims = self
            .codec
            .decode(token)
            .map_err(|e| AppError::unauthorized("invalid").with_source(e))?;

        let (first_name, last_name) = match claims.name.split_once(' ') {
            Some((first, last)) => (first.to_string(), last.to_string()),
            None => (claims.name, String::new()),
        };

        Ok(Identity {
            id: claims.id,
            email: claims.email,
            first_name,
            last_name,
            role: Role::from_admin_flag(claims.admin),
        })
    }
}
