//! Title and author name: non-empty, at most 100 characters

use kernel::error::app_error::{AppError, AppResult};
use serde::Serialize;

pub const TITLE_MAX_LENGTH: usize = 100;
pub const AUTHOR_NAME_MAX_LENGTH: usize = 100;

fn bounded(field: &'static str, raw: String, max: usize) -> AppResult<String> {
    let value = raw.trim().to_string();
    if value.is_empty() {
        return Err(AppError::not_valid(field, "must not be empty"));
    }
    if value.chars().count() > max {
        return Err(AppError::not_valid(
            field,
            format!("must be at most {} characters", max),
        ));
    }
    Ok(value)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Title(String);

impl Title {
    pub fn new(raw: impl Into<String>) -> AppResult<Self> {
        bounded("title", raw.into(), TITLE_MAX_LENGTH).map(Self)
    }

    pub fn from_db(raw: String) -> Self {
        Self(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AuthorName(String);

impl AuthorName {
    pub fn new(raw: impl Into<String>) -> AppResult<Self> {
        bounded("authorName", raw.into(), AUTHOR_NAME_MAX_LENGTH).map(Self)
    }

    pub fn from_db(raw: String) -> Self {
        Self(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_bounds() {
        assert_eq!(Title::new("  Euclid ").unwrap().as_str(), "Euclid");
        assert!(Title::new("").is_err());
        assert!(Title::new("t".repeat(100)).is_ok());
        assert_eq!(
            Title::new("t".repeat(101)).unwrap_err().to_string(),
            "title not valid: must be at most 100 characters"
        );
    }

    #[test]
    fn test_author_name_bounds() {
        assert!(AuthorName::new("E.").is_ok());
        assert!(AuthorName::new("  ").is_err());
        assert!(AuthorName::new("a".repeat(101)).is_err());
    }
}
