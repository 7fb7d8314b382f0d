//! Budgets: planned spending/income envelopes, optionally time-boxed.

pub mod error;
pub mod service;
pub mod types;

pub use error::BudgetError;
pub use service::BudgetService;
pub use types::{Budget, CreateBudgetInput, UpdateBudgetInput};
