//! Entity Module

pub mod book;
