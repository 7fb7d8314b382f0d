//! Usage aggregation over voucher allocations.

use rayon::prelude::*;
use rust_decimal::Decimal;

use super::types::{BudgetUsage, DateRange, EarmarkUsage};
use crate::budget::Budget;
use crate::earmark::Earmark;
use crate::voucher::{Voucher, VoucherType};

/// Upper bound of the reported percentage.
pub const PERCENT_CAP: Decimal = Decimal::from_parts(200, 0, 0, false, 0);

/// Pure usage computations.
pub struct UsageAggregator;

impl UsageAggregator {
    /// Usage of one budget, optionally restricted to a date window.
    #[must_use]
    pub fn budget_usage<'v, I>(budget: &Budget, vouchers: I, range: DateRange) -> BudgetUsage
    where
        I: IntoIterator<Item = &'v Voucher>,
    {
        let (spent, inflow) = vouchers
            .into_iter()
            .filter(|v| range.contains(v.date))
            .fold((Decimal::ZERO, Decimal::ZERO), |(out, inc), v| {
                let amount = v.budget_amount(budget.id);
                match v.voucher_type {
                    VoucherType::Out => (out + amount, inc),
                    VoucherType::In => (out, inc + amount),
                    VoucherType::Transfer => (out, inc),
                }
            });

        let consumed = spent - inflow;
        BudgetUsage {
            budget_id: budget.id,
            planned: budget.planned_amount,
            spent,
            inflow,
            remaining: budget.planned_amount - consumed,
            percent: Self::percent(consumed, budget.planned_amount),
        }
    }

    /// Usage of one earmark over all vouchers.
    #[must_use]
    pub fn earmark_usage<'v, I>(earmark: &Earmark, vouchers: I) -> EarmarkUsage
    where
        I: IntoIterator<Item = &'v Voucher>,
    {
        let (allocated, released) =
            vouchers
                .into_iter()
                .fold((Decimal::ZERO, Decimal::ZERO), |(out, inc), v| {
                    let amount = v.earmark_amount(earmark.id);
                    match v.voucher_type {
                        VoucherType::Out => (out + amount, inc),
                        VoucherType::In => (out, inc + amount),
                        VoucherType::Transfer => (out, inc),
                    }
                });

        EarmarkUsage {
            earmark_id: earmark.id,
            budget: earmark.budget_amount,
            allocated,
            released,
            balance: released - allocated,
            remaining: earmark.budget_amount - allocated + released,
            percent: Self::percent(allocated - released, earmark.budget_amount),
        }
    }

    /// Usage of every non-archived budget, optionally of one year.
    ///
    /// Budgets are aggregated in parallel over the same voucher slice, so all
    /// results reflect one snapshot. Output order follows `budgets`.
    #[must_use]
    pub fn all_budget_usage(
        budgets: &[Budget],
        vouchers: &[&Voucher],
        year: Option<i32>,
    ) -> Vec<BudgetUsage> {
        budgets
            .par_iter()
            .filter(|b| !b.archived && year.is_none_or(|y| b.year == y))
            .map(|b| Self::budget_usage(b, vouchers.iter().copied(), DateRange::default()))
            .collect()
    }

    /// `min(200, consumed / base * 100)` rounded to 2 dp, 0 for a base <= 0.
    ///
    /// A quotient too large to represent reports `PERCENT_CAP`, or its
    /// negation when `consumed` is negative.
    #[must_use]
    pub fn percent(consumed: Decimal, base: Decimal) -> Decimal {
        if base <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        let Some(percent) = consumed
            .checked_div(base)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        else {
            return if consumed.is_sign_negative() {
                -PERCENT_CAP
            } else {
                PERCENT_CAP
            };
        };
        percent.round_dp(2).min(PERCENT_CAP)
    }
}
