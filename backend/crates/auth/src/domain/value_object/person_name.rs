//! First/last name value object

use kernel::error::app_error::{AppError, AppResult};

pub const NAME_MAX_LENGTH: usize = 150;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName(String);

impl PersonName {
    /// `field` names the input in validation messages
    pub fn new(field: &'static str, raw: impl Into<String>) -> AppResult<Self> {
        let name = raw.into().trim().to_string();

        if name.is_empty() {
            return Err(AppError::not_valid(field, "must not be empty"));
        }
        if name.chars().count() > NAME_MAX_LENGTH {
            return Err(AppError::not_valid(
                field,
                format!("must be at most {} characters", NAME_MAX_LENGTH),
            ));
        }

        Ok(Self(name))
    }

    /// No whitespace: the token `name` claim is split back on its first space
    pub fn first(raw: impl Into<String>) -> AppResult<Self> {
        let name = Self::new("firstName", raw)?;
        if name.0.chars().any(char::is_whitespace) {
            return Err(AppError::not_valid("firstName", "must not contain spaces"));
        }
        Ok(name)
    }

    pub fn last(raw: impl Into<String>) -> AppResult<Self> {
        Self::new("lastName", raw)
    }

    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PersonName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
