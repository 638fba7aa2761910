//! User Password Value Objects
//!
//! Domain wrappers over `platform::password`.
//!
//! ## Security Features
//! - bcrypt hashing (work factor 12)
//! - Automatic memory zeroization of plaintext
//! - Redacted `Debug` output
//!
//! Registration enforces the 6 to 20 character policy; login only requires a
//! non-empty candidate so that any stored hash can be checked.

use kernel::error::app_error::{AppError, AppResult, ResultExt};
use platform::password::{ClearTextPassword, HashedPassword, PasswordPolicyError};
use std::fmt;

// ============================================================================
// Raw Password (User Input)
// ============================================================================

/// Raw password from user input
///
/// Memory is automatically zeroized when dropped.
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Create a new raw password, enforcing the registration policy
    pub fn new(raw: String) -> AppResult<Self> {
        let clear_text = ClearTextPassword::new(raw).map_err(|e| {
            let cause = match e {
                PasswordPolicyError::TooShort { min, .. } => {
                    format!("must be at least {} characters", min)
                }
                PasswordPolicyError::TooLong { max, .. } => {
                    format!("must be at most {} characters", max)
                }
                PasswordPolicyError::TooManyBytes { max, .. } => {
                    format!("must be at most {} bytes", max)
                }
                PasswordPolicyError::EmptyOrWhitespace => "must not be empty".to_string(),
                PasswordPolicyError::InvalidCharacter => {
                    "must not contain control characters".to_string()
                }
            };
            AppError::not_valid("password", cause)
        })?;

        Ok(Self(clear_text))
    }

    /// Candidate password for a login attempt
    pub fn for_login(raw: String) -> AppResult<Self> {
        if raw.is_empty() {
            return Err(AppError::not_valid("password", "must not be empty"));
        }
        Ok(Self(ClearTextPassword::unchecked(raw)))
    }

    /// Wrap a generated password
    pub fn generated(raw: String) -> Self {
        Self(ClearTextPassword::unchecked(raw))
    }

    /// Access the inner ClearTextPassword
    pub(crate) fn inner(&self) -> &ClearTextPassword {
        &self.0
    }

    /// Owned copy, zeroized independently (moved onto blocking threads)
    pub(crate) fn duplicate(&self) -> Self {
        Self(ClearTextPassword::unchecked(self.0.expose().to_owned()))
    }

    /// Plaintext, for the password reset e-mail only
    pub fn expose(&self) -> &str {
        self.0.expose()
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// Password Hash (Stored)
// ============================================================================

/// Stored bcrypt hash (60 characters)
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(HashedPassword);

impl PasswordHash {
    pub fn from_hashed(hashed: HashedPassword) -> Self {
        Self(hashed)
    }

    /// Load from database
    pub fn from_db(hash: String) -> AppResult<Self> {
        HashedPassword::from_hash_string(hash)
            .map(Self)
            .or_internal("stored password hash is malformed")
    }

    pub(crate) fn inner(&self) -> &HashedPassword {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PasswordHash").field(&"[HASH]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::error::kind::ErrorKind;

    #[test]
    fn test_registration_policy() {
        assert!(RawPassword::new("secret1".into()).is_ok());

        let err = RawPassword::new("wrong".into()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotValid);
        assert_eq!(err.to_string(), "password not valid: must be at least 6 characters");

        let err = RawPassword::new("x".repeat(21)).unwrap_err();
        assert_eq!(err.to_string(), "password not valid: must be at most 20 characters");

        let err = RawPassword::new("\u{1F511}".repeat(19)).unwrap_err();
        assert_eq!(err.to_string(), "password not valid: must be at most 72 bytes");
    }

    #[test]
    fn test_login_accepts_short_candidates() {
        assert!(RawPassword::for_login("wrong".into()).is_ok());
        assert!(RawPassword::for_login(String::new()).is_err());
    }

    #[test]
    fn test_duplicate_keeps_value() {
        let raw = RawPassword::generated("Ab3dEf7h".into());
        assert_eq!(raw.duplicate().expose(), "Ab3dEf7h");
    }

    #[test]
    fn test_malformed_hash_is_internal() {
        let err = PasswordHash::from_db("nope".into()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_debug_redaction() {
        let raw = RawPassword::new("secret1".into()).unwrap();
        assert!(!format!("{:?}", raw).contains("secret1"));
    }
}
