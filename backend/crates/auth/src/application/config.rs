//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HS256 signing secret
    pub jwt_secret: Vec<u8>,
    /// Token lifetime; `None` issues tokens without `exp`
    pub jwt_ttl: Option<Duration>,
    /// bcrypt work factor
    pub bcrypt_cost: u32,
    /// Length of passwords generated by the reset flow
    pub reset_password_length: usize,
    /// Subject line of the password reset e-mail
    pub reset_email_subject: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: Vec::new(),
            jwt_ttl: Some(Duration::from_secs(24 * 3600)), // 1 day
            bcrypt_cost: platform::password::DEFAULT_COST,
            reset_password_length: 8,
            reset_email_subject: "Your new password".to_string(),
        }
    }
}

impl AuthConfig {
    /// Config with the given secret and defaults elsewhere
    pub fn with_secret(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: secret.into(),
            ..Default::default()
        }
    }
}
