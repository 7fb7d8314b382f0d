//! Core bookkeeping logic for Kassenwart.
//!
//! This crate contains pure business logic with ZERO web or storage
//! dependencies. All domain types, validation rules and calculations live
//! here; persistence and transport wrap these services.
//!
//! # Modules
//!
//! - `amount` - Gross/net/VAT derivation
//! - `allocation` - Budget and earmark allocation checks
//! - `budget` - Budgets and their date windows
//! - `earmark` - Restricted-purpose funds
//! - `voucher` - Voucher validation pipeline, patches and queries
//! - `usage` - Budget and earmark usage projections
//! - `cash_advance` - Cash advances, partials and resolution

pub mod allocation;
pub mod amount;
pub mod budget;
pub mod cash_advance;
pub mod earmark;
pub mod error;
pub mod usage;
pub mod voucher;
