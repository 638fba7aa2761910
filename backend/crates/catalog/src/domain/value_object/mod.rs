//! Value Object Module

pub mod bounded_text;
pub mod price;
