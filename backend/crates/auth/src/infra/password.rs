//! bcrypt adapter and random password generator

use kernel::error::app_error::{AppError, AppResult, ResultExt};
use platform::password::BcryptHasher;

use crate::domain::service::{PasswordGenerator, PasswordHasher};
use crate::domain::value_object::user_password::{PasswordHash, RawPassword};

/// [`PasswordHasher`] backed by bcrypt, run on the blocking pool
#[derive(Debug, Clone, Copy, Default)]
pub struct BcryptPasswordHasher {
    inner: BcryptHasher,
}

impl BcryptPasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self {
            inner: BcryptHasher::new(cost),
        }
    }
}

impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, password: &RawPassword) -> AppResult<PasswordHash> {
        let hasher = self.inner;
        let password = password.duplicate();

        let hashed = tokio::task::spawn_blocking(move || hasher.hash(password.inner()))
            .await
            .or_internal("password hashing task failed")?
            .or_internal("password hashing failed")?;

        Ok(PasswordHash::from_hashed(hashed))
    }

    async fn verify(&self, hash: &PasswordHash, password: &RawPassword) -> AppResult<()> {
        let hasher = self.inner;
        let hashed = hash.inner().clone();
        let password = password.duplicate();

        let matches = tokio::task::spawn_blocking(move || hasher.verify(&hashed, password.inner()))
            .await
            .or_internal("password verification task failed")?
            .or_internal("password verification failed")?;

        if matches {
            Ok(())
        } else {
            Err(AppError::wrong_password("password does not match"))
        }
    }
}

/// Alphanumeric passwords from the OS random source
#[derive(Debug, Clone, Copy)]
pub struct RandomPasswordGenerator {
    length: usize,
}

impl RandomPasswordGenerator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl PasswordGenerator for RandomPasswordGenerator {
    fn generate(&self) -> RawPassword {
        RawPassword::generated(platform::crypto::random_alphanumeric(self.length))
    }
}
