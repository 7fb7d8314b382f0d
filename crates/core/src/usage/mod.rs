//! Budget and earmark usage projections.
//!
//! Usage is a pure read projection over the vouchers' allocation lists.
//! OUT allocations consume, IN allocations give back.

pub mod aggregator;
pub mod cache;
pub mod types;

#[cfg(test)]
mod aggregator_props;

pub use aggregator::{PERCENT_CAP, UsageAggregator};
pub use cache::UsageCache;
pub use types::{BudgetUsage, DateRange, EarmarkUsage};
