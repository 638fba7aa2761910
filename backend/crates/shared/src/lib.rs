//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of domain vocabulary:
//! - The closed error taxonomy and result aliases
//! - Typed ID wrappers for users, books and orders
//! - The authenticated identity and its role
//! - The pagination contract shared by every listing endpoint
//! - HTTP glue (error rendering, admin guard, extractors) behind the `axum` feature
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning across all domains.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
#[cfg(feature = "axum")]
pub mod http;
pub mod id;
pub mod identity;
pub mod pagination;
