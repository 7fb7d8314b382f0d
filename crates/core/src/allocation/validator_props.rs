//! Property-based tests for allocation validation.
//!
//! - Property 4: Allocation Sum Bound
//! - Property 5: Duplicate Detection

use kassenwart_shared::BudgetId;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::error::AllocationError;
use super::types::BudgetAllocation;
use super::validator::{ALLOCATION_TOLERANCE, AllocationValidator};

fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for allocation lists with distinct targets.
fn distinct_allocations() -> impl Strategy<Value = Vec<BudgetAllocation>> {
    prop::collection::vec(positive_amount(), 1..8).prop_map(|amounts| {
        amounts
            .into_iter()
            .enumerate()
            .map(|(i, amount)| BudgetAllocation {
                budget_id: BudgetId::new(i64::try_from(i).unwrap_or(0) + 1),
                amount,
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property 4.1: an accepted list never exceeds total * 1.001.
    #[test]
    fn prop_accepted_sum_within_bound(
        allocations in distinct_allocations(),
        total in positive_amount(),
    ) {
        let sum = AllocationValidator::effective_sum(&allocations);
        match AllocationValidator::validate(&allocations, total) {
            Ok(()) => prop_assert!(sum <= total * ALLOCATION_TOLERANCE),
            Err(AllocationError::SumExceedsTotal { sum: reported, .. }) => {
                prop_assert_eq!(reported, sum);
                prop_assert!(sum > total * ALLOCATION_TOLERANCE);
            }
            Err(other) => prop_assert!(false, "unexpected error {other:?}"),
        }
    }

    /// Property 4.2: a list summing exactly to the total is always accepted.
    #[test]
    fn prop_exact_sum_accepted(allocations in distinct_allocations()) {
        let total = AllocationValidator::effective_sum(&allocations);
        prop_assert!(AllocationValidator::validate(&allocations, total).is_ok());
    }

    /// Property 5.1: repeating any target is reported as that target.
    #[test]
    fn prop_repeated_target_detected(
        mut allocations in distinct_allocations(),
        pick in any::<prop::sample::Index>(),
    ) {
        let duplicate = allocations[pick.index(allocations.len())];
        allocations.push(duplicate);
        prop_assert_eq!(
            AllocationValidator::validate(&allocations, Decimal::MAX),
            Err(AllocationError::DuplicateTarget(duplicate.budget_id.into_inner()))
        );
    }
}
