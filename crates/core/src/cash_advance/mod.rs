//! Cash advances and their partials.
//!
//! Lifecycle: OPEN until resolved, RESOLVED is terminal. OVERDUE is derived
//! from the due date and never stored.

pub mod error;
pub mod service;
pub mod types;

pub use error::CashAdvanceError;
pub use service::CashAdvanceService;
pub use types::{
    AddPartialInput, AdvanceState, CashAdvance, CashAdvanceFilter, CashAdvanceStatus,
    CashAdvanceTotals, CashAdvanceView, CashAdvanceWarning, CreateCashAdvanceInput,
    PartialCashAdvance, ResolutionPlan, ResolveInput, SettlePartialInput, UpdateCashAdvanceInput,
};
