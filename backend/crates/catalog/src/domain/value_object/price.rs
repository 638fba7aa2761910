//! Price in minor currency units

use kernel::error::app_error::{AppError, AppResult};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    pub fn new(minor_units: i64) -> AppResult<Self> {
        if minor_units < 0 {
            return Err(AppError::not_valid("price", "must not be negative"));
        }
        Ok(Self(minor_units))
    }

    /// Parse a form field such as `"4000"`
    pub fn parse(raw: &str) -> AppResult<Self> {
        let value = raw
            .trim()
            .parse::<i64>()
            .map_err(|_| AppError::not_valid("price", "must be an integer amount in minor units"))?;
        Self::new(value)
    }

    pub fn from_db(minor_units: i64) -> Self {
        Self(minor_units)
    }

    pub fn minor_units(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(Price::parse("4000").unwrap().minor_units(), 4000);
        assert_eq!(Price::parse("0").unwrap().minor_units(), 0);
        assert!(Price::parse("-1").is_err());
        assert!(Price::parse("12.50").is_err());
        assert!(Price::parse("").is_err());
    }
}
