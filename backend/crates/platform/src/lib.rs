//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations with no domain knowledge:
//! - Cryptographic utilities (HMAC, random material)
//! - Password hashing (bcrypt, work factor 12)
//! - JWT encoding and verification (HS256)
//! - S3 and SES clients on the AWS SDK
//! - Stripe payment intents and webhook signature verification

pub mod aws;
pub mod crypto;
pub mod jwt;
pub mod password;
pub mod stripe;
