//! Repositories over the shared store.
//!
//! Each repository is a thin handle; all of them share one lock, so a unit
//! run by one repository is atomic with respect to every other.

pub mod budget;
pub mod cash_advance;
pub mod earmark;
pub mod voucher;

pub use budget::BudgetRepository;
pub use cash_advance::{CashAdvanceRepository, CashAdvanceResolution, PartialWrite};
pub use earmark::EarmarkRepository;
pub use voucher::{VoucherRepository, VoucherWrite};
