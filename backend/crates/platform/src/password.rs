//! Password Hashing and Verification
//!
//! Password handling with:
//! - bcrypt hashing (adaptive, work factor 12 by default)
//! - Zeroization of sensitive data
//! - Constant-time comparison (inside `bcrypt::verify`)
//!
//! ## Security Features
//! - Per-call random salt, so hashing the same password twice yields
//!   different strings
//! - Zeroization prevents memory inspection attacks
//! - Hash strings are always 60 characters (`$2b$12$` + 53)

use std::fmt;

use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ============================================================================
// Constants
// ============================================================================

/// Minimum password length (in characters)
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Maximum password length (in characters)
pub const MAX_PASSWORD_LENGTH: usize = 20;

/// bcrypt only reads this many bytes of input
pub const BCRYPT_MAX_BYTES: usize = 72;

/// Default bcrypt work factor
pub const DEFAULT_COST: u32 = 12;

/// Length of a bcrypt hash string
pub const HASH_LENGTH: usize = 60;

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    /// Password is too short
    #[error("password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    /// Password is too long
    #[error("password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    /// Password encodes to more bytes than bcrypt reads
    #[error("password must be at most {max} bytes (got {actual})")]
    TooManyBytes { max: usize, actual: usize },

    /// Password contains only whitespace
    #[error("password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,

    /// Password contains invalid characters (control characters)
    #[error("password contains invalid control characters")]
    InvalidCharacter,
}

/// Password hashing/verification errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    /// Hashing operation failed
    #[error("password hashing failed: {0}")]
    HashingFailed(#[from] bcrypt::BcryptError),

    /// Input longer than bcrypt can hash without truncation
    #[error("password exceeds {BCRYPT_MAX_BYTES} bytes")]
    TooLong,

    /// Invalid hash format
    #[error("invalid password hash format")]
    InvalidHashFormat,
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// ## Security
/// - Implements `Zeroize` and `ZeroizeOnDrop`
/// - Does not implement `Clone` to prevent accidental copies
/// - Debug output is redacted
///
/// ## Examples
/// ```rust
/// use platform::password::ClearTextPassword;
///
/// let password = ClearTextPassword::new("secret1".to_string()).unwrap();
/// // Password is automatically zeroized when dropped
/// ```
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Create a new clear text password, enforcing the registration policy
    ///
    /// - Between [`MIN_PASSWORD_LENGTH`] and [`MAX_PASSWORD_LENGTH`] characters
    /// - At most [`BCRYPT_MAX_BYTES`] bytes of UTF-8
    /// - No control characters
    /// - Not empty/whitespace only
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        if raw.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        // Count Unicode code points (not bytes)
        let char_count = raw.chars().count();

        if char_count < MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: MIN_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        if char_count > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        if raw.len() > BCRYPT_MAX_BYTES {
            return Err(PasswordPolicyError::TooManyBytes {
                max: BCRYPT_MAX_BYTES,
                actual: raw.len(),
            });
        }

        if raw.chars().any(|ch| ch.is_control()) {
            return Err(PasswordPolicyError::InvalidCharacter);
        }

        Ok(Self(raw))
    }

    /// Wrap a password that is only going to be compared, never stored
    ///
    /// Login must be able to check any candidate against the stored hash,
    /// including ones that would not pass the registration policy.
    pub fn unchecked(raw: String) -> Self {
        Self(raw)
    }

    /// Get the password as bytes for hashing
    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Expose the plaintext (password reset e-mail only)
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// bcrypt hash string (`$2b$<cost>$<salt+hash>`)
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Create from a stored hash string (e.g., from database)
    pub fn from_hash_string(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let hash = s.into();

        if hash.len() != HASH_LENGTH || !hash.starts_with("$2") {
            return Err(PasswordHashError::InvalidHashFormat);
        }

        Ok(Self { hash })
    }

    /// Get the hash string for storage
    pub fn as_str(&self) -> &str {
        &self.hash
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Hasher
// ============================================================================

/// bcrypt hasher with a configurable work factor
#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash with a fresh random salt
    ///
    /// Input over [`BCRYPT_MAX_BYTES`] is refused rather than truncated.
    /// CPU bound: callers on an async runtime should run this on a
    /// blocking thread.
    pub fn hash(&self, password: &ClearTextPassword) -> Result<HashedPassword, PasswordHashError> {
        let hash = match bcrypt::non_truncating_hash(password.as_bytes(), self.cost) {
            Ok(hash) => hash,
            Err(bcrypt::BcryptError::Truncation(_)) => return Err(PasswordHashError::TooLong),
            Err(err) => return Err(err.into()),
        };
        HashedPassword::from_hash_string(hash)
    }

    /// Compare a candidate against a stored hash
    ///
    /// Returns `Ok(false)` on mismatch; errors only on a malformed hash.
    /// Nothing over [`BCRYPT_MAX_BYTES`] was ever hashed, so such a
    /// candidate never matches.
    pub fn verify(
        &self,
        hashed: &HashedPassword,
        password: &ClearTextPassword,
    ) -> Result<bool, PasswordHashError> {
        match bcrypt::non_truncating_verify(password.as_bytes(), hashed.as_str()) {
            Ok(matches) => Ok(matches),
            Err(bcrypt::BcryptError::Truncation(_)) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
