//! Usage summary types.

use chrono::NaiveDate;
use kassenwart_shared::{BudgetId, EarmarkId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Optional inclusive date window for budget usage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day (inclusive).
    pub from: Option<NaiveDate>,
    /// Last day (inclusive).
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// Creates a range.
    #[must_use]
    pub const fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    /// True when neither bound is set.
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Whether `date` lies within the range.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }
}

/// Planned vs. actual figures of one budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetUsage {
    /// The budget.
    pub budget_id: BudgetId,
    /// Planned amount.
    pub planned: Decimal,
    /// Sum of OUT allocations.
    pub spent: Decimal,
    /// Sum of IN allocations.
    pub inflow: Decimal,
    /// `planned - (spent - inflow)`, may be negative.
    pub remaining: Decimal,
    /// Net consumption in percent of planned, capped at 200.
    pub percent: Decimal,
}

/// Budget vs. allocation figures of one earmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarmarkUsage {
    /// The earmark.
    pub earmark_id: EarmarkId,
    /// Earmark budget amount.
    pub budget: Decimal,
    /// Sum of OUT allocations.
    pub allocated: Decimal,
    /// Sum of IN allocations.
    pub released: Decimal,
    /// `released - allocated`.
    pub balance: Decimal,
    /// `budget - allocated + released`, may be negative.
    pub remaining: Decimal,
    /// Net consumption in percent of budget, capped at 200.
    pub percent: Decimal,
}
