//! # Stockpile Shared Library
//!
//! Shared types and storage access used across the Stockpile backend
//! services. Today the only consumer is the notification worker
//! (`stockpile-notifier`), but the split mirrors the rest of the backend:
//! models and the store contract live here so future services reuse them.
//!
//! ## Module Organization
//!
//! - `models`: Domain records (households, users, pantry items, inbox)
//! - `store`: The `PantryStore` trait plus Postgres and in-memory backends
//! - `config`: Environment-driven configuration
//! - `error`: Common error types

pub mod config;
pub mod error;
pub mod models;
pub mod store;

/// Current version of the Stockpile shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
