//! Voucher domain types.
//!
//! A voucher is one recorded financial event: an income (`IN`), an expense
//! (`OUT`) or an internal transfer between cash and bank (`TRANSFER`).

use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use kassenwart_shared::{
    BudgetId, CashAdvanceId, CategoryId, EarmarkId, InvoiceId, TaxonomyId, TermId, VoucherId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::allocation::{BudgetAllocation, EarmarkAllocation};
use crate::amount::Amounts;

/// Direction of a voucher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VoucherType {
    /// Income.
    In,
    /// Expense.
    Out,
    /// Internal transfer between cash and bank.
    Transfer,
}

/// Legacy non-profit tax sphere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sphere {
    /// Ideational sphere.
    Ideell,
    /// Purpose operation.
    Zweck,
    /// Asset management.
    Vermoegen,
    /// Commercial operation.
    Wgb,
}

impl Sphere {
    /// Wire code of the sphere.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Ideell => "IDEELL",
            Self::Zweck => "ZWECK",
            Self::Vermoegen => "VERMOEGEN",
            Self::Wgb => "WGB",
        }
    }
}

impl FromStr for Sphere {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "IDEELL" => Ok(Self::Ideell),
            "ZWECK" => Ok(Self::Zweck),
            "VERMOEGEN" => Ok(Self::Vermoegen),
            "WGB" => Ok(Self::Wgb),
            other => Err(format!("unknown sphere: {other}")),
        }
    }
}

/// Classification of a voucher under one of the two exclusive schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Legacy sphere.
    Sphere(Sphere),
    /// Custom booking category.
    Category(CategoryId),
}

impl Classification {
    /// Key used when sorting by category.
    #[must_use]
    pub fn sort_key(&self) -> String {
        match self {
            Self::Sphere(sphere) => sphere.code().to_string(),
            Self::Category(id) => format!("{:020}", id.into_inner()),
        }
    }
}

/// Cash or bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMethod {
    /// Cash box.
    Bar,
    /// Bank account.
    Bank,
}

impl PaymentMethod {
    /// Wire code of the method.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Bar => "BAR",
            Self::Bank => "BANK",
        }
    }
}

/// How money moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Payment {
    /// Income or expense paid via one method.
    Method(PaymentMethod),
    /// Transfer between two different methods.
    Transfer {
        /// Source.
        from: PaymentMethod,
        /// Destination.
        to: PaymentMethod,
    },
}

impl Payment {
    /// Whether this payment touches `method`.
    #[must_use]
    pub fn involves(&self, method: PaymentMethod) -> bool {
        match *self {
            Self::Method(m) => m == method,
            Self::Transfer { from, to } => from == method || to == method,
        }
    }

    /// Key used when sorting by payment method.
    #[must_use]
    pub fn sort_key(&self) -> String {
        match self {
            Self::Method(m) => m.code().to_string(),
            Self::Transfer { from, to } => format!("{}>{}", from.code(), to.code()),
        }
    }
}

/// Assignment of one taxonomy term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TermAssignment {
    /// Taxonomy the term belongs to.
    pub taxonomy_id: TaxonomyId,
    /// Selected term.
    pub term_id: TermId,
}

/// A dependent record pointing at a voucher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoucherReference {
    /// Invoice posting owned by an external collaborator.
    Invoice(InvoiceId),
    /// Counter voucher of a resolved cash advance.
    CashAdvance(CashAdvanceId),
}

impl VoucherReference {
    /// Whether callers may link and unlink this reference directly.
    ///
    /// Cash advance links are set by resolution and live as long as the
    /// advance.
    #[must_use]
    pub const fn is_caller_managed(&self) -> bool {
        matches!(self, Self::Invoice(_))
    }
}

/// A persisted voucher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voucher {
    /// Voucher ID.
    pub id: VoucherId,
    /// Human-readable number `<year>-<seq:05>`.
    pub voucher_no: String,
    /// Direction.
    pub voucher_type: VoucherType,
    /// Booking date.
    pub date: NaiveDate,
    /// Sphere or category.
    pub classification: Classification,
    /// Payment method or transfer direction.
    pub payment: Payment,
    /// Derived amounts.
    pub amounts: Amounts,
    /// Free text description.
    pub description: String,
    /// Budget allocations, in entry order.
    pub budgets: Vec<BudgetAllocation>,
    /// Earmark allocations, in entry order.
    pub earmarks: Vec<EarmarkAllocation>,
    /// Tags.
    pub tags: BTreeSet<String>,
    /// Taxonomy terms, at most one per taxonomy.
    pub terms: Vec<TermAssignment>,
    /// Incremented on every update.
    pub version: u32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Voucher {
    /// Year the voucher number is counted in.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Gross amount.
    #[must_use]
    pub const fn gross(&self) -> Decimal {
        self.amounts.gross_amount
    }

    /// Budgets this voucher allocates to.
    pub fn budget_ids(&self) -> impl Iterator<Item = BudgetId> + '_ {
        self.budgets.iter().map(|a| a.budget_id)
    }

    /// Earmarks this voucher allocates to.
    pub fn earmark_ids(&self) -> impl Iterator<Item = EarmarkId> + '_ {
        self.earmarks.iter().map(|a| a.earmark_id)
    }

    /// Amount allocated to `budget_id`, zero if none.
    #[must_use]
    pub fn budget_amount(&self, budget_id: BudgetId) -> Decimal {
        self.budgets
            .iter()
            .filter(|a| a.budget_id == budget_id)
            .map(|a| a.amount)
            .sum()
    }

    /// Amount allocated to `earmark_id`, zero if none.
    #[must_use]
    pub fn earmark_amount(&self, earmark_id: EarmarkId) -> Decimal {
        self.earmarks
            .iter()
            .filter(|a| a.earmark_id == earmark_id)
            .map(|a| a.amount)
            .sum()
    }
}

/// Non-blocking notice returned alongside a successful write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VoucherWarning {
    /// Allocation to an archived budget.
    ArchivedBudget {
        /// The budget.
        budget_id: BudgetId,
    },
    /// Allocation to an archived earmark.
    ArchivedEarmark {
        /// The earmark.
        earmark_id: EarmarkId,
    },
    /// The budget's remaining amount dropped below zero.
    BudgetOverrun {
        /// The budget.
        budget_id: BudgetId,
        /// Remaining amount after the write.
        remaining: Decimal,
    },
    /// The earmark's remaining amount dropped below zero.
    EarmarkOverdrawn {
        /// The earmark.
        earmark_id: EarmarkId,
        /// Remaining amount after the write.
        remaining: Decimal,
    },
}

/// Injected time context for ledger writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostingContext {
    /// Today's date from the caller's clock.
    pub today: NaiveDate,
    /// Vouchers dated on or before this date are locked.
    pub locked_until: Option<NaiveDate>,
}

impl PostingContext {
    /// Creates a context.
    #[must_use]
    pub const fn new(today: NaiveDate, locked_until: Option<NaiveDate>) -> Self {
        Self { today, locked_until }
    }

    /// Whether `date` falls into the locked period.
    #[must_use]
    pub fn is_locked(&self, date: NaiveDate) -> bool {
        self.locked_until.is_some_and(|until| date <= until)
    }
}
