//! Allocation entry types.

use kassenwart_shared::{BudgetId, EarmarkId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Common view over budget and earmark allocations.
pub trait AllocationEntry {
    /// Raw id of the allocation target.
    fn target_key(&self) -> i64;

    /// Allocated amount.
    fn amount(&self) -> Decimal;
}

/// Part of a voucher's amount assigned to a budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetAllocation {
    /// Target budget.
    pub budget_id: BudgetId,
    /// Allocated amount.
    pub amount: Decimal,
}

/// Part of a voucher's amount assigned to an earmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarmarkAllocation {
    /// Target earmark.
    pub earmark_id: EarmarkId,
    /// Allocated amount.
    pub amount: Decimal,
}

impl AllocationEntry for BudgetAllocation {
    fn target_key(&self) -> i64 {
        self.budget_id.into_inner()
    }

    fn amount(&self) -> Decimal {
        self.amount
    }
}

impl AllocationEntry for EarmarkAllocation {
    fn target_key(&self) -> i64 {
        self.earmark_id.into_inner()
    }

    fn amount(&self) -> Decimal {
        self.amount
    }
}
