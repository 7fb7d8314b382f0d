//! In-memory store for the Kassenwart ledger.
//!
//! This crate provides:
//! - `Store`, the shared handle holding all records behind one lock
//! - Repositories running each write as one validate-then-write unit
//! - Usage cache wiring (invalidation on writes, inserts under the read lock)
//! - An injectable `Clock` for "today" and timestamps

pub mod clock;
pub mod repositories;
mod state;
mod store;

#[cfg(test)]
mod test_support;

pub use clock::{Clock, FixedClock, SystemClock};
pub use repositories::{
    BudgetRepository, CashAdvanceRepository, CashAdvanceResolution, EarmarkRepository,
    PartialWrite, VoucherRepository, VoucherWrite,
};
pub use store::Store;
