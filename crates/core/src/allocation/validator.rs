//! Allocation validator.

use std::collections::HashSet;

use rust_decimal::Decimal;

use super::error::AllocationError;
use super::types::AllocationEntry;

/// Allowed overshoot of the allocation sum over the voucher total (0.1 %).
pub const ALLOCATION_TOLERANCE: Decimal = Decimal::from_parts(1001, 0, 0, false, 3);

/// Validates allocation lists against a voucher total.
pub struct AllocationValidator;

impl AllocationValidator {
    /// Validates one allocation list.
    ///
    /// Rules, in order:
    /// 1. no target id may appear twice (checked over every entry)
    /// 2. entries with an amount <= 0 are ignored
    /// 3. the remaining amounts may not exceed `total * 1.001`
    ///
    /// # Errors
    ///
    /// Returns `AllocationError::DuplicateTarget` for a repeated target and
    /// `AllocationError::SumExceedsTotal` when the sum is out of bounds.
    pub fn validate<A: AllocationEntry>(
        allocations: &[A],
        total: Decimal,
    ) -> Result<(), AllocationError> {
        let mut seen = HashSet::with_capacity(allocations.len());
        for allocation in allocations {
            if !seen.insert(allocation.target_key()) {
                return Err(AllocationError::DuplicateTarget(allocation.target_key()));
            }
        }

        let sum = Self::effective_sum(allocations);
        if sum > total.saturating_mul(ALLOCATION_TOLERANCE) {
            return Err(AllocationError::SumExceedsTotal { sum, total });
        }

        Ok(())
    }

    /// Sum of all strictly positive allocations, saturating at `Decimal::MAX`.
    #[must_use]
    pub fn effective_sum<A: AllocationEntry>(allocations: &[A]) -> Decimal {
        allocations
            .iter()
            .map(AllocationEntry::amount)
            .filter(|amount| *amount > Decimal::ZERO)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Drops entries that are not persisted (amount <= 0), keeping order.
    #[must_use]
    pub fn normalize<A: AllocationEntry + Clone>(allocations: &[A]) -> Vec<A> {
        allocations
            .iter()
            .filter(|a| a.amount() > Decimal::ZERO)
            .cloned()
            .collect()
    }
}
