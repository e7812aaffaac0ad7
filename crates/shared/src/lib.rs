//! Shared types, errors, and configuration for Tally.
//!
//! This crate provides common types used across all other crates:
//! - Canonical currency codes
//! - Opaque caller-supplied ids
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, LogConfig, SummaryConfig};
pub use error::{AppError, AppResult};
