//! Property-based tests for usage aggregation.
//!
//! - Property 6: Usage Identities
//! - Property 7: Percent Bounds

use std::collections::BTreeSet;

use chrono::{NaiveDate, Utc};
use kassenwart_shared::{BudgetId, EarmarkId, VoucherId};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::aggregator::{PERCENT_CAP, UsageAggregator};
use super::types::DateRange;
use crate::allocation::{BudgetAllocation, EarmarkAllocation};
use crate::amount::AmountCalculator;
use crate::budget::Budget;
use crate::earmark::Earmark;
use crate::voucher::{Classification, Payment, PaymentMethod, Sphere, Voucher, VoucherType};

fn amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn voucher_type() -> impl Strategy<Value = VoucherType> {
    prop_oneof![Just(VoucherType::In), Just(VoucherType::Out)]
}

fn vouchers() -> impl Strategy<Value = Vec<Voucher>> {
    prop::collection::vec((voucher_type(), amount(), 1u32..=28), 0..20).prop_map(|rows| {
        let now = Utc::now();
        rows.into_iter()
            .enumerate()
            .map(|(i, (voucher_type, amount, day))| Voucher {
                id: VoucherId::new(i64::try_from(i).unwrap_or(0) + 1),
                voucher_no: String::new(),
                voucher_type,
                date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
                classification: Classification::Sphere(Sphere::Zweck),
                payment: Payment::Method(PaymentMethod::Bar),
                amounts: AmountCalculator::transfer(amount).unwrap(),
                description: String::new(),
                budgets: vec![BudgetAllocation { budget_id: BudgetId::new(1), amount }],
                earmarks: vec![EarmarkAllocation { earmark_id: EarmarkId::new(1), amount }],
                tags: BTreeSet::new(),
                terms: vec![],
                version: 1,
                created_at: now,
                updated_at: now,
            })
            .collect()
    })
}

fn budget(planned: Decimal) -> Budget {
    let now = Utc::now();
    Budget {
        id: BudgetId::new(1),
        year: 2025,
        planned_amount: planned,
        name: None,
        category_name: None,
        project: None,
        start_date: None,
        end_date: None,
        enforce_time_range: false,
        color: None,
        archived: false,
        created_at: now,
        updated_at: now,
    }
}

fn earmark(amount: Decimal) -> Earmark {
    let now = Utc::now();
    Earmark {
        id: EarmarkId::new(1),
        code: "ZB".into(),
        name: String::new(),
        budget_amount: amount,
        color: None,
        description: None,
        archived: false,
        created_at: now,
        updated_at: now,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property 6.1: remaining = planned - (spent - inflow).
    #[test]
    fn prop_budget_remaining_identity(vouchers in vouchers(), planned in amount()) {
        let usage =
            UsageAggregator::budget_usage(&budget(planned), &vouchers, DateRange::default());
        prop_assert_eq!(usage.remaining, planned - (usage.spent - usage.inflow));
    }

    /// Property 6.2: budget usage is idempotent without intervening writes.
    #[test]
    fn prop_budget_usage_idempotent(vouchers in vouchers(), planned in amount()) {
        let b = budget(planned);
        let first = UsageAggregator::budget_usage(&b, &vouchers, DateRange::default());
        let second = UsageAggregator::budget_usage(&b, &vouchers, DateRange::default());
        prop_assert_eq!(first, second);
    }

    /// Property 6.3: earmark balance and remaining agree.
    #[test]
    fn prop_earmark_identities(vouchers in vouchers(), total in amount()) {
        let usage = UsageAggregator::earmark_usage(&earmark(total), &vouchers);
        prop_assert_eq!(usage.balance, usage.released - usage.allocated);
        prop_assert_eq!(usage.remaining, total + usage.balance);
    }

    /// Property 7.1: percent never exceeds the cap and has at most 2 dp.
    #[test]
    fn prop_percent_bounded(vouchers in vouchers(), planned in amount()) {
        let usage =
            UsageAggregator::budget_usage(&budget(planned), &vouchers, DateRange::default());
        prop_assert!(usage.percent <= PERCENT_CAP);
        prop_assert!(usage.percent.scale() <= 2);
    }
}
