//! Budget and earmark allocation checks.
//!
//! A voucher's gross amount may be split across budgets and across
//! earmarks. Both lists are validated independently with the same rules.

pub mod error;
pub mod types;
pub mod validator;

#[cfg(test)]
mod validator_props;

pub use error::AllocationError;
pub use types::{AllocationEntry, BudgetAllocation, EarmarkAllocation};
pub use validator::{ALLOCATION_TOLERANCE, AllocationValidator};
