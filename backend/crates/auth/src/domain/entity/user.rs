//! User Entity

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use kernel::identity::{Identity, Role};

use crate::domain::value_object::{
    email::Email, person_name::PersonName, user_password::PasswordHash,
};

/// User entity
///
/// Created by registration; only the password hash changes afterwards.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub first_name: PersonName,
    pub last_name: PersonName,
    /// Unique, case-sensitive as stored
    pub email: Email,
    pub role: Role,
    pub password_hash: PasswordHash,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// New customer account with a fresh id
    pub fn register(
        first_name: PersonName,
        last_name: PersonName,
        email: Email,
        password_hash: PasswordHash,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: UserId::new(),
            first_name,
            last_name,
            email,
            role: Role::Customer,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the stored hash
    pub fn change_password(&mut self, password_hash: PasswordHash) {
        self.password_hash = password_hash;
        self.updated_at = Utc::now();
    }

    /// `"<first> <last>"`
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// The caller view carried by tokens
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id,
            email: self.email.as_str().to_string(),
            first_name: self.first_name.as_str().to_string(),
            last_name: self.last_name.as_str().to_string(),
            role: self.role,
        }
    }
}
