//! Cash advance lifecycle rules.
//!
//! An advance is OPEN until resolved. While open, partials can be added,
//! settled and removed. Resolution requires every partial to be settled and
//! may produce a compensating voucher for the difference between the amount
//! drawn and the amount accounted for.

use chrono::{DateTime, NaiveDate, Utc};
use kassenwart_shared::{
    CashAdvanceConfig, CashAdvanceId, OverdraftPolicy, PartialId, SettledPartialDeletion, VoucherId,
};
use rust_decimal::Decimal;

use super::error::CashAdvanceError;
use super::types::{
    AddPartialInput, AdvanceState, CashAdvance, CashAdvanceWarning, CreateCashAdvanceInput,
    PartialCashAdvance, ResolutionPlan, SettlePartialInput, UpdateCashAdvanceInput,
};
use crate::amount::{AmountCalculator, AmountInput};
use crate::voucher::{Classification, EntryDraft, PaymentMethod, VoucherDraft};

/// Cash advance service for business logic.
pub struct CashAdvanceService;

impl CashAdvanceService {
    /// Builds a new open advance.
    ///
    /// # Errors
    ///
    /// Returns `EmptyField`, `InvalidAmount`, `AmountOutOfRange` or
    /// `DuplicateOrderNo`.
    pub fn create<F>(
        id: CashAdvanceId,
        input: CreateCashAdvanceInput,
        now: DateTime<Utc>,
        order_taken: F,
    ) -> Result<CashAdvance, CashAdvanceError>
    where
        F: Fn(&str) -> bool,
    {
        let order_no = required("order_no", &input.order_no)?;
        let holder_name = required("holder_name", &input.holder_name)?;
        if input.total_amount <= Decimal::ZERO {
            return Err(CashAdvanceError::InvalidAmount(input.total_amount));
        }
        check_money(input.total_amount)?;
        if order_taken(&order_no) {
            return Err(CashAdvanceError::DuplicateOrderNo(order_no));
        }

        Ok(CashAdvance {
            id,
            order_no,
            holder_name,
            purpose: input.purpose.trim().to_string(),
            total_amount: input.total_amount,
            state: AdvanceState::Open,
            due_date: input.due_date,
            notes: input.notes,
            resolved_at: None,
            counter_voucher_id: None,
            partials: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Fails unless the advance is still open.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyResolved`.
    pub fn ensure_open(advance: &CashAdvance) -> Result<(), CashAdvanceError> {
        if advance.is_resolved() {
            return Err(CashAdvanceError::AlreadyResolved(advance.id));
        }
        Ok(())
    }

    /// Applies a partial update to an open advance.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyResolved` or `EmptyField`.
    pub fn apply_update(
        existing: &CashAdvance,
        input: UpdateCashAdvanceInput,
        now: DateTime<Utc>,
    ) -> Result<CashAdvance, CashAdvanceError> {
        Self::ensure_open(existing)?;

        let mut advance = existing.clone();
        if let Some(holder) = input.holder_name {
            advance.holder_name = required("holder_name", &holder)?;
        }
        if let Some(purpose) = input.purpose {
            advance.purpose = purpose.trim().to_string();
        }
        if input.due_date.is_some() {
            advance.due_date = input.due_date;
        }
        if input.notes.is_some() {
            advance.notes = input.notes;
        }
        advance.updated_at = now;
        Ok(advance)
    }

    /// Checks that an advance may be deleted.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyResolved` or `HasCounterVoucher`.
    pub fn check_delete(advance: &CashAdvance) -> Result<(), CashAdvanceError> {
        if advance.counter_voucher_id.is_some() {
            return Err(CashAdvanceError::HasCounterVoucher(advance.id));
        }
        Self::ensure_open(advance)
    }

    /// Builds a new partial for an open advance.
    ///
    /// A partial larger than the planned remainder yields a warning or an
    /// error depending on the overdraft policy.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyResolved`, `EmptyField`, `InvalidAmount`,
    /// `AmountOutOfRange` or `ExceedsPlannedRemaining`.
    pub fn add_partial(
        advance: &CashAdvance,
        partial_id: PartialId,
        input: AddPartialInput,
        today: NaiveDate,
        config: &CashAdvanceConfig,
    ) -> Result<(PartialCashAdvance, Vec<CashAdvanceWarning>), CashAdvanceError> {
        Self::ensure_open(advance)?;
        let recipient_name = required("recipient_name", &input.recipient_name)?;
        if input.planned_amount <= Decimal::ZERO {
            return Err(CashAdvanceError::InvalidAmount(input.planned_amount));
        }
        check_money(input.planned_amount)?;

        let mut warnings = Vec::new();
        let planned_remaining = advance.totals().planned_remaining;
        if input.planned_amount > planned_remaining {
            match config.overdraft_policy {
                OverdraftPolicy::Reject => {
                    return Err(CashAdvanceError::ExceedsPlannedRemaining {
                        planned_remaining,
                        amount: input.planned_amount,
                    });
                }
                OverdraftPolicy::Warn => warnings.push(CashAdvanceWarning::ExceedsPlannedRemaining {
                    planned_remaining,
                    amount: input.planned_amount,
                }),
            }
        }

        let partial = PartialCashAdvance {
            id: partial_id,
            cash_advance_id: advance.id,
            recipient_name,
            planned_amount: input.planned_amount,
            issued_at: input.issued_at.unwrap_or(today),
            description: input.description,
            is_settled: false,
            settled_amount: None,
            settled_at: None,
        };
        Ok((partial, warnings))
    }

    /// Returns the partial with its settlement recorded.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyResolved`, `PartialNotFound`, `PartialAlreadySettled`,
    /// `NegativeSettlement` or `AmountOutOfRange`.
    pub fn settle_partial(
        advance: &CashAdvance,
        partial_id: PartialId,
        input: SettlePartialInput,
        today: NaiveDate,
    ) -> Result<PartialCashAdvance, CashAdvanceError> {
        Self::ensure_open(advance)?;
        let partial = advance
            .partial(partial_id)
            .ok_or(CashAdvanceError::PartialNotFound(partial_id))?;
        if partial.is_settled {
            return Err(CashAdvanceError::PartialAlreadySettled(partial_id));
        }
        if input.settled_amount < Decimal::ZERO {
            return Err(CashAdvanceError::NegativeSettlement(input.settled_amount));
        }
        check_money(input.settled_amount)?;

        Ok(PartialCashAdvance {
            is_settled: true,
            settled_amount: Some(input.settled_amount),
            settled_at: Some(input.settled_at.unwrap_or(today)),
            ..partial.clone()
        })
    }

    /// Checks that a partial may be removed.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyResolved`, `PartialNotFound` or
    /// `SettledPartialDeletionDenied`.
    pub fn check_delete_partial(
        advance: &CashAdvance,
        partial_id: PartialId,
        config: &CashAdvanceConfig,
    ) -> Result<(), CashAdvanceError> {
        Self::ensure_open(advance)?;
        let partial = advance
            .partial(partial_id)
            .ok_or(CashAdvanceError::PartialNotFound(partial_id))?;
        if partial.is_settled && config.settled_partial_deletion == SettledPartialDeletion::Reject {
            return Err(CashAdvanceError::SettledPartialDeletionDenied(partial_id));
        }
        Ok(())
    }

    /// Works out what resolving the advance does.
    ///
    /// With `create_counter` set and a non-zero difference, the plan carries
    /// a BAR voucher dated `today`: income when money came back (difference
    /// above zero), expense when the holder paid out more than was drawn.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyResolved`, `UnsettledPartialsRemain` or
    /// `MissingCounterClassification`.
    pub fn plan_resolution(
        advance: &CashAdvance,
        create_counter: bool,
        classification: Option<Classification>,
        today: NaiveDate,
    ) -> Result<ResolutionPlan, CashAdvanceError> {
        Self::ensure_open(advance)?;
        let unsettled = advance.partials.iter().filter(|p| !p.is_settled).count();
        if unsettled > 0 {
            return Err(CashAdvanceError::UnsettledPartialsRemain { count: unsettled });
        }

        let difference = advance.totals().actual_remaining;
        if !create_counter || difference.is_zero() {
            return Ok(ResolutionPlan {
                difference,
                counter_voucher: None,
            });
        }

        let classification =
            classification.ok_or(CashAdvanceError::MissingCounterClassification)?;
        let entry = EntryDraft {
            date: today,
            classification,
            payment_method: PaymentMethod::Bar,
            amount: AmountInput::Gross {
                gross: difference.abs(),
            },
            description: format!("Ausgleich Barvorschuss {}", advance.order_no),
            budgets: Vec::new(),
            earmarks: Vec::new(),
            tags: Default::default(),
            terms: Vec::new(),
        };
        let draft = if difference > Decimal::ZERO {
            VoucherDraft::Income(entry)
        } else {
            VoucherDraft::Expense(entry)
        };

        Ok(ResolutionPlan {
            difference,
            counter_voucher: Some(draft),
        })
    }

    /// Marks the advance resolved.
    #[must_use]
    pub fn resolve(
        advance: &CashAdvance,
        counter_voucher_id: Option<VoucherId>,
        now: DateTime<Utc>,
    ) -> CashAdvance {
        CashAdvance {
            state: AdvanceState::Resolved,
            resolved_at: Some(now),
            counter_voucher_id,
            updated_at: now,
            ..advance.clone()
        }
    }
}

fn required(field: &'static str, value: &str) -> Result<String, CashAdvanceError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CashAdvanceError::EmptyField(field));
    }
    Ok(value.to_string())
}

fn check_money(amount: Decimal) -> Result<(), CashAdvanceError> {
    if AmountCalculator::in_range(amount) && AmountCalculator::is_cents(amount) {
        Ok(())
    } else {
        Err(CashAdvanceError::AmountOutOfRange(amount))
    }
}
