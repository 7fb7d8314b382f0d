//! Cash advance domain types.

use chrono::{DateTime, NaiveDate, Utc};
use kassenwart_shared::{CashAdvanceId, PartialId, VoucherId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::voucher::{Classification, VoucherDraft};

/// Stored lifecycle state. `RESOLVED` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AdvanceState {
    /// Partials may still be added, settled or removed.
    Open,
    /// Closed for good.
    Resolved,
}

/// Status as shown to callers, with `OVERDUE` derived from the due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CashAdvanceStatus {
    /// Open and not past due.
    Open,
    /// Resolved.
    Resolved,
    /// Open and past its due date.
    Overdue,
}

/// One recipient's planned draw against an advance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialCashAdvance {
    /// Partial ID.
    pub id: PartialId,
    /// Owning advance.
    pub cash_advance_id: CashAdvanceId,
    /// Who received the money.
    pub recipient_name: String,
    /// Planned amount.
    pub planned_amount: Decimal,
    /// Date the money was handed out.
    pub issued_at: NaiveDate,
    /// Description.
    pub description: Option<String>,
    /// Whether the recipient has accounted for the money.
    pub is_settled: bool,
    /// Amount actually accounted for.
    pub settled_amount: Option<Decimal>,
    /// Settlement date.
    pub settled_at: Option<NaiveDate>,
}

/// A lump sum drawn in advance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashAdvance {
    /// Advance ID.
    pub id: CashAdvanceId,
    /// Order number, unique.
    pub order_no: String,
    /// Person holding the money.
    pub holder_name: String,
    /// Purpose.
    pub purpose: String,
    /// Total amount drawn.
    pub total_amount: Decimal,
    /// Stored lifecycle state.
    pub state: AdvanceState,
    /// Due date for settlement.
    pub due_date: Option<NaiveDate>,
    /// Notes.
    pub notes: Option<String>,
    /// Resolution timestamp.
    pub resolved_at: Option<DateTime<Utc>>,
    /// Compensating voucher created on resolution.
    pub counter_voucher_id: Option<VoucherId>,
    /// Partials, in creation order.
    pub partials: Vec<PartialCashAdvance>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl CashAdvance {
    /// Whether the advance is resolved.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self.state, AdvanceState::Resolved)
    }

    /// Status on `today`.
    #[must_use]
    pub fn status(&self, today: NaiveDate) -> CashAdvanceStatus {
        match self.state {
            AdvanceState::Resolved => CashAdvanceStatus::Resolved,
            AdvanceState::Open if self.due_date.is_some_and(|due| due < today) => {
                CashAdvanceStatus::Overdue
            }
            AdvanceState::Open => CashAdvanceStatus::Open,
        }
    }

    /// Looks up a partial.
    #[must_use]
    pub fn partial(&self, partial_id: PartialId) -> Option<&PartialCashAdvance> {
        self.partials.iter().find(|p| p.id == partial_id)
    }

    /// Derived totals.
    ///
    /// Sums saturate and coverage is 0 when the ratio is not representable.
    #[must_use]
    pub fn totals(&self) -> CashAdvanceTotals {
        let total_planned = self
            .partials
            .iter()
            .map(|p| p.planned_amount)
            .fold(Decimal::ZERO, Decimal::saturating_add);
        let total_settled = self
            .partials
            .iter()
            .filter(|p| p.is_settled)
            .filter_map(|p| p.settled_amount)
            .fold(Decimal::ZERO, Decimal::saturating_add);
        let coverage = total_settled
            .checked_div(self.total_amount)
            .map_or(Decimal::ZERO, |ratio| ratio.round_dp(4));

        CashAdvanceTotals {
            total_planned,
            total_settled,
            planned_remaining: self.total_amount.saturating_sub(total_planned),
            actual_remaining: self.total_amount.saturating_sub(total_settled),
            coverage,
        }
    }
}

/// Figures derived from an advance and its partials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashAdvanceTotals {
    /// Sum of planned partial amounts.
    pub total_planned: Decimal,
    /// Sum of settled amounts.
    pub total_settled: Decimal,
    /// `total - total_planned`.
    pub planned_remaining: Decimal,
    /// `total - total_settled`.
    pub actual_remaining: Decimal,
    /// `total_settled / total` as a ratio, 0 when total is 0.
    pub coverage: Decimal,
}

/// An advance together with its derived status and totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CashAdvanceView {
    /// The stored advance.
    #[serde(flatten)]
    pub advance: CashAdvance,
    /// Derived status.
    pub status: CashAdvanceStatus,
    /// Derived totals.
    pub totals: CashAdvanceTotals,
}

impl CashAdvanceView {
    /// Builds the view as of `today`.
    #[must_use]
    pub fn new(advance: CashAdvance, today: NaiveDate) -> Self {
        let status = advance.status(today);
        let totals = advance.totals();
        Self {
            advance,
            status,
            totals,
        }
    }
}

/// List filter for advances.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CashAdvanceFilter {
    /// Derived status to match.
    #[serde(default)]
    pub status: Option<CashAdvanceStatus>,
    /// Case-insensitive search over order number, holder and purpose.
    #[serde(default)]
    pub q: Option<String>,
}

impl CashAdvanceFilter {
    /// Whether `advance` passes the filter on `today`.
    #[must_use]
    pub fn matches(&self, advance: &CashAdvance, today: NaiveDate) -> bool {
        if let Some(status) = self.status
            && advance.status(today) != status
        {
            return false;
        }
        let Some(q) = self.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) else {
            return true;
        };
        let q = q.to_lowercase();
        [&advance.order_no, &advance.holder_name, &advance.purpose]
            .iter()
            .any(|field| field.to_lowercase().contains(&q))
    }
}

/// Input for creating an advance.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCashAdvanceInput {
    /// Order number.
    pub order_no: String,
    /// Holder.
    pub holder_name: String,
    /// Purpose.
    #[serde(default)]
    pub purpose: String,
    /// Total amount (> 0).
    pub total_amount: Decimal,
    /// Due date.
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// Notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Partial update of an open advance.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCashAdvanceInput {
    /// New holder.
    pub holder_name: Option<String>,
    /// New purpose.
    pub purpose: Option<String>,
    /// New due date.
    pub due_date: Option<NaiveDate>,
    /// New notes.
    pub notes: Option<String>,
}

/// Input for adding a partial.
#[derive(Debug, Clone, Deserialize)]
pub struct AddPartialInput {
    /// Recipient.
    pub recipient_name: String,
    /// Planned amount (> 0).
    pub planned_amount: Decimal,
    /// Issue date, defaults to today.
    #[serde(default)]
    pub issued_at: Option<NaiveDate>,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Input for settling a partial.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SettlePartialInput {
    /// Amount accounted for (>= 0).
    pub settled_amount: Decimal,
    /// Settlement date, defaults to today.
    #[serde(default)]
    pub settled_at: Option<NaiveDate>,
}

/// Input for resolving an advance.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ResolveInput {
    /// Create a compensating voucher for a non-zero difference.
    #[serde(default)]
    pub create_counter_voucher: bool,
    /// Classification of the counter voucher, else the configured default.
    #[serde(default)]
    pub classification: Option<Classification>,
}

/// What resolving an advance will do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionPlan {
    /// `total - total_settled`.
    pub difference: Decimal,
    /// Compensating voucher to create, if any.
    pub counter_voucher: Option<VoucherDraft>,
}

/// Non-blocking notice from partial operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CashAdvanceWarning {
    /// The new partial exceeds what is left of the advance.
    ExceedsPlannedRemaining {
        /// Planned remainder before the partial.
        planned_remaining: Decimal,
        /// Amount of the partial.
        amount: Decimal,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn advance(total: Decimal, settled: &[Decimal]) -> CashAdvance {
        let now = Utc::now();
        let day = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        CashAdvance {
            id: CashAdvanceId::new(1),
            order_no: "BV-1".into(),
            holder_name: "Kassenwart".into(),
            purpose: String::new(),
            total_amount: total,
            state: AdvanceState::Open,
            due_date: None,
            notes: None,
            resolved_at: None,
            counter_voucher_id: None,
            partials: settled
                .iter()
                .zip(1..)
                .map(|(amount, id)| PartialCashAdvance {
                    id: PartialId::new(id),
                    cash_advance_id: CashAdvanceId::new(1),
                    recipient_name: "Helfer".into(),
                    planned_amount: *amount,
                    issued_at: day,
                    description: None,
                    is_settled: true,
                    settled_amount: Some(*amount),
                    settled_at: Some(day),
                })
                .collect(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_totals() {
        let totals = advance(dec!(1000), &[dec!(300), dec!(200)]).totals();
        assert_eq!(totals.total_planned, dec!(500));
        assert_eq!(totals.total_settled, dec!(500));
        assert_eq!(totals.planned_remaining, dec!(500));
        assert_eq!(totals.actual_remaining, dec!(500));
        assert_eq!(totals.coverage, dec!(0.5));
    }

    #[test]
    fn test_coverage_zero_when_total_is_zero() {
        let totals = advance(Decimal::ZERO, &[dec!(10)]).totals();
        assert_eq!(totals.coverage, Decimal::ZERO);
    }

    #[test]
    fn test_coverage_of_tiny_total_does_not_overflow() {
        let totals = advance(Decimal::new(1, 28), &[Decimal::MAX, Decimal::MAX]).totals();
        assert_eq!(totals.total_settled, Decimal::MAX);
        assert_eq!(totals.coverage, Decimal::ZERO);
    }
}
