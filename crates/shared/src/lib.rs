//! Shared types, errors, and configuration for Kutip.
//!
//! This crate provides common types used across all other crates:
//! - Money helpers with decimal precision
//! - Typed IDs for type-safe entity references
//! - The `MonthKey` calendar-month bucket type
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, CommunityConfig};
pub use error::{AppError, AppResult};
