//! Shared types, errors, and configuration for the subsidiary ledger service.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for vouchers, companies and branches
//! - Money rounding and the report currency selector
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::AppError;
