//! Shared types, errors, and configuration for Kassenwart.
//!
//! This crate provides common types used across all other crates:
//! - Typed integer IDs for type-safe entity references
//! - Offset/limit pagination types for list queries
//! - Application-wide error type and error classification
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{
    AppConfig, CashAdvanceConfig, ClassificationScheme, LedgerConfig, OverdraftPolicy,
    SettledPartialDeletion,
};
pub use error::{AppError, AppResult, ErrorKind};
pub use types::*;
