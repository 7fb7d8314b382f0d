//! Voucher drafts and patches.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{Classification, Payment, PaymentMethod, TermAssignment, Voucher, VoucherType};
use crate::allocation::{BudgetAllocation, EarmarkAllocation};
use crate::amount::{AmountInput, TaxMode, VatRate};

/// Input for an income or expense voucher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDraft {
    /// Booking date.
    pub date: NaiveDate,
    /// Sphere or category.
    pub classification: Classification,
    /// Cash or bank.
    pub payment_method: PaymentMethod,
    /// Authoritative amount.
    pub amount: AmountInput,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Budget allocations.
    #[serde(default)]
    pub budgets: Vec<BudgetAllocation>,
    /// Earmark allocations.
    #[serde(default)]
    pub earmarks: Vec<EarmarkAllocation>,
    /// Tags.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Taxonomy terms.
    #[serde(default)]
    pub terms: Vec<TermAssignment>,
}

/// Input for a transfer between cash and bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferDraft {
    /// Booking date.
    pub date: NaiveDate,
    /// Sphere or category.
    pub classification: Classification,
    /// Source of the money.
    pub transfer_from: Option<PaymentMethod>,
    /// Destination of the money.
    pub transfer_to: Option<PaymentMethod>,
    /// Transferred amount (no VAT).
    pub amount: Decimal,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Tags.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Taxonomy terms.
    #[serde(default)]
    pub terms: Vec<TermAssignment>,
}

/// A voucher to be validated and persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VoucherDraft {
    /// Income.
    #[serde(rename = "IN")]
    Income(EntryDraft),
    /// Expense.
    #[serde(rename = "OUT")]
    Expense(EntryDraft),
    /// Transfer.
    #[serde(rename = "TRANSFER")]
    Transfer(TransferDraft),
}

impl VoucherDraft {
    /// Direction of the draft.
    #[must_use]
    pub const fn voucher_type(&self) -> VoucherType {
        match self {
            Self::Income(_) => VoucherType::In,
            Self::Expense(_) => VoucherType::Out,
            Self::Transfer(_) => VoucherType::Transfer,
        }
    }

    /// Booking date.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        match self {
            Self::Income(d) | Self::Expense(d) => d.date,
            Self::Transfer(t) => t.date,
        }
    }

    /// Rebuilds the draft a stored voucher was created from.
    #[must_use]
    pub fn from_voucher(voucher: &Voucher) -> Self {
        match voucher.payment {
            Payment::Transfer { from, to } => Self::Transfer(TransferDraft {
                date: voucher.date,
                classification: voucher.classification,
                transfer_from: Some(from),
                transfer_to: Some(to),
                amount: voucher.amounts.gross_amount,
                description: voucher.description.clone(),
                tags: voucher.tags.clone(),
                terms: voucher.terms.clone(),
            }),
            Payment::Method(payment_method) => {
                let entry = EntryDraft {
                    date: voucher.date,
                    classification: voucher.classification,
                    payment_method,
                    amount: voucher.amounts.input(),
                    description: voucher.description.clone(),
                    budgets: voucher.budgets.clone(),
                    earmarks: voucher.earmarks.clone(),
                    tags: voucher.tags.clone(),
                    terms: voucher.terms.clone(),
                };
                if voucher.voucher_type == VoucherType::In {
                    Self::Income(entry)
                } else {
                    Self::Expense(entry)
                }
            }
        }
    }
}

/// How a patch changes the voucher amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum AmountPatch {
    /// Replace the authoritative figure.
    Set {
        /// New input.
        input: AmountInput,
    },
    /// Switch tax mode, re-deriving from the held figures.
    SwitchMode {
        /// Target mode.
        mode: TaxMode,
        /// Rate to apply when switching to NET.
        #[serde(default)]
        vat_rate: Option<VatRate>,
    },
}

/// Partial update of a voucher. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherPatch {
    /// Version the caller last saw.
    #[serde(default)]
    pub expected_version: Option<u32>,
    /// New booking date.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// New classification.
    #[serde(default)]
    pub classification: Option<Classification>,
    /// New payment method (income/expense only).
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    /// New transfer source (transfer only).
    #[serde(default)]
    pub transfer_from: Option<PaymentMethod>,
    /// New transfer destination (transfer only).
    #[serde(default)]
    pub transfer_to: Option<PaymentMethod>,
    /// Amount change.
    #[serde(default)]
    pub amount: Option<AmountPatch>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
    /// Replacement budget allocations.
    #[serde(default)]
    pub budgets: Option<Vec<BudgetAllocation>>,
    /// Replacement earmark allocations.
    #[serde(default)]
    pub earmarks: Option<Vec<EarmarkAllocation>>,
    /// Replacement tags.
    #[serde(default)]
    pub tags: Option<BTreeSet<String>>,
    /// Replacement taxonomy terms.
    #[serde(default)]
    pub terms: Option<Vec<TermAssignment>>,
}
