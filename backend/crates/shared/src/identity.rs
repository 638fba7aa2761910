//! Identity - the authenticated caller
//!
//! [`Identity`] is what the authentication middleware places into the
//! request extensions once a bearer token has been verified. Handlers in every
//! bounded context read it; only the auth context produces it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::app_error::AppError;
use crate::id::UserId;

/// Coarse authorization label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    #[default]
    Customer,
}

impl Role {
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Customer => "CUSTOMER",
        }
    }

    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    #[inline]
    pub const fn from_admin_flag(admin: bool) -> Self {
        if admin { Role::Admin } else { Role::Customer }
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        match code {
            "ADMIN" => Ok(Role::Admin),
            "CUSTOMER" => Ok(Role::Customer),
            other => Err(AppError::internal(format!("unknown role code: {}", other))),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Authenticated caller, as recovered from a verified token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
}

impl Identity {
    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Whether this caller may see a resource owned by `owner`
    ///
    /// Admins see everything; customers only what they own.
    #[inline]
    pub fn can_access(&self, owner: &UserId) -> bool {
        self.is_admin() || &self.id == owner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_codes() {
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("CUSTOMER".parse::<Role>().unwrap(), Role::Customer);
        assert!("admin".parse::<Role>().is_err());
        assert_eq!(Role::Admin.to_string(), "ADMIN");
        assert_eq!(Role::from_admin_flag(true), Role::Admin);
        assert_eq!(Role::from_admin_flag(false), Role::Customer);
    }

    #[test]
    fn test_can_access() {
        let owner = UserId::new();
        let customer = Identity {
            id: UserId::new(),
            email: "c@example.com".into(),
            first_name: "C".into(),
            last_name: "D".into(),
            role: Role::Customer,
        };
        assert!(!customer.can_access(&owner));

        let admin = Identity {
            role: Role::Admin,
            ..customer.clone()
        };
        assert!(admin.can_access(&owner));

        let me = Identity {
            id: owner,
            ..customer
        };
        assert!(me.can_access(&owner));
    }
}
