//! Fixtures shared by the repository tests.

use std::sync::Arc;

use chrono::NaiveDate;
use kassenwart_core::allocation::{BudgetAllocation, EarmarkAllocation};
use kassenwart_core::amount::AmountInput;
use kassenwart_core::budget::CreateBudgetInput;
use kassenwart_core::cash_advance::CreateCashAdvanceInput;
use kassenwart_core::earmark::CreateEarmarkInput;
use kassenwart_core::voucher::{Classification, EntryDraft, PaymentMethod, Sphere, VoucherDraft};
use kassenwart_shared::{AppConfig, BudgetId, EarmarkId};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::clock::FixedClock;
use crate::store::Store;

pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub(crate) fn store_on(today: NaiveDate) -> Store {
    Store::with_clock(&AppConfig::default(), Arc::new(FixedClock::on(today)))
}

fn entry(day: NaiveDate, gross: Decimal) -> EntryDraft {
    EntryDraft {
        date: day,
        classification: Classification::Sphere(Sphere::Ideell),
        payment_method: PaymentMethod::Bank,
        amount: AmountInput::Gross { gross },
        description: "Testbeleg".into(),
        budgets: Vec::new(),
        earmarks: Vec::new(),
        tags: Default::default(),
        terms: Vec::new(),
    }
}

pub(crate) fn expense(day: NaiveDate, gross: Decimal) -> VoucherDraft {
    VoucherDraft::Expense(entry(day, gross))
}

pub(crate) fn expense_for_budget(
    day: NaiveDate,
    gross: Decimal,
    budget_id: BudgetId,
) -> VoucherDraft {
    let mut entry = entry(day, gross);
    entry.budgets = vec![BudgetAllocation {
        budget_id,
        amount: gross,
    }];
    VoucherDraft::Expense(entry)
}

pub(crate) fn expense_for_earmark(
    day: NaiveDate,
    gross: Decimal,
    earmark_id: EarmarkId,
) -> VoucherDraft {
    let mut entry = entry(day, gross);
    entry.earmarks = vec![EarmarkAllocation {
        earmark_id,
        amount: gross,
    }];
    VoucherDraft::Expense(entry)
}

pub(crate) fn budget_input(planned: Decimal) -> CreateBudgetInput {
    CreateBudgetInput {
        year: 2025,
        planned_amount: planned,
        name: None,
        category_name: None,
        project: None,
        start_date: None,
        end_date: None,
        enforce_time_range: false,
        color: None,
    }
}

pub(crate) fn earmark_input(code: &str) -> CreateEarmarkInput {
    CreateEarmarkInput {
        code: code.into(),
        name: "Jugendarbeit".into(),
        budget_amount: dec!(500),
        color: None,
        description: None,
    }
}

pub(crate) fn advance_input(order_no: &str, total: Decimal) -> CreateCashAdvanceInput {
    CreateCashAdvanceInput {
        order_no: order_no.into(),
        holder_name: "Kassenwart".into(),
        purpose: "Sommerfest".into(),
        total_amount: total,
        due_date: None,
        notes: None,
    }
}
