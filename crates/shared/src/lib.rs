//! Shared types, errors, and configuration for Cogest.
//!
//! This crate provides common types used across all other crates:
//! - Money helpers with millime (3 decimal place) precision
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
