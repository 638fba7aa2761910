//! In-memory doubles for tests

use std::collections::HashMap;
use std::sync::Mutex;

use kernel::error::app_error::{AppError, AppResult};
use kernel::id::UserId;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::service::PasswordResetMailer;
use crate::domain::value_object::{email::Email, user_password::RawPassword};

/// [`UserRepository`] over a map, enforcing email uniqueness
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user directly (bypasses uniqueness)
    pub fn insert(&self, user: User) {
        self.lock().insert(user.id, user);
    }

    pub fn get_by_email(&self, email: &str) -> Option<User> {
        self.lock()
            .values()
            .find(|u| u.email.as_str() == email)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<UserId, User>> {
        self.users.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl UserRepository for InMemoryUserRepository {
    async fn save(&self, user: &User) -> AppResult<()> {
        let mut users = self.lock();
        if users.values().any(|u| u.email == user.email) {
            return Err(AppError::duplicate_key(
                "email",
                "a user with this email already exists",
            ));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> AppResult<()> {
        let mut users = self.lock();
        match users.get_mut(&user.id) {
            Some(slot) => {
                *slot = user.clone();
                Ok(())
            }
            None => Err(AppError::entity_not_found("User", "no row to update")),
        }
    }

    async fn find_by_email(&self, email: &Email) -> AppResult<Option<User>> {
        Ok(self.lock().values().find(|u| &u.email == email).cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> AppResult<Option<User>> {
        Ok(self.lock().get(id).cloned())
    }
}

/// One captured password reset
#[derive(Debug, Clone)]
pub struct SentReset {
    pub to: String,
    pub first_name: String,
    pub new_password: String,
}

/// Mailer that records instead of sending
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<SentReset>>,
    fail: bool,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every send fails with an internal error
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<SentReset> {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl PasswordResetMailer for RecordingMailer {
    async fn send_password_reset(
        &self,
        to: &Email,
        first_name: &str,
        new_password: &RawPassword,
    ) -> AppResult<()> {
        if self.fail {
            return Err(AppError::internal("mail transport unavailable"));
        }
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(SentReset {
                to: to.as_str().to_string(),
                first_name: first_name.to_string(),
                new_password: new_password.expose().to_string(),
            });
        Ok(())
    }
}
