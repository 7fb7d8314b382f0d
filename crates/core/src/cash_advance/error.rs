//! Cash advance error types.

use kassenwart_shared::{CashAdvanceId, ErrorKind, PartialId};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::voucher::VoucherError;

/// Errors that can occur during cash advance operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CashAdvanceError {
    /// Advance not found.
    #[error("Cash advance not found: {0}")]
    NotFound(CashAdvanceId),

    /// Partial not found.
    #[error("Partial cash advance not found: {0}")]
    PartialNotFound(PartialId),

    /// Amount must be positive.
    #[error("Amount must be positive, got {0}")]
    InvalidAmount(Decimal),

    /// Amount above the maximum or finer than cents.
    #[error("Amount {0} must be whole cents and at most 1000000000000")]
    AmountOutOfRange(Decimal),

    /// Settled amount cannot be negative.
    #[error("Settled amount cannot be negative, got {0}")]
    NegativeSettlement(Decimal),

    /// A required text field is blank.
    #[error("Field {0} must not be empty")]
    EmptyField(&'static str),

    /// Another advance uses this order number.
    #[error("Order number already exists: {0}")]
    DuplicateOrderNo(String),

    /// The advance is resolved and cannot change.
    #[error("Cash advance {0} is already resolved")]
    AlreadyResolved(CashAdvanceId),

    /// Resolution requires all partials to be settled.
    #[error("{count} partial(s) are not settled yet")]
    UnsettledPartialsRemain {
        /// Number of unsettled partials.
        count: usize,
    },

    /// Partial exceeds the planned remainder (reject policy).
    #[error("Partial amount {amount} exceeds planned remainder {planned_remaining}")]
    ExceedsPlannedRemaining {
        /// Planned remainder before the partial.
        planned_remaining: Decimal,
        /// Amount of the partial.
        amount: Decimal,
    },

    /// Settled partials may not be deleted (reject policy).
    #[error("Partial {0} is settled and cannot be deleted")]
    SettledPartialDeletionDenied(PartialId),

    /// Partial was settled before.
    #[error("Partial {0} is already settled")]
    PartialAlreadySettled(PartialId),

    /// No classification for the counter voucher.
    #[error("No classification available for the counter voucher")]
    MissingCounterClassification,

    /// Advance with a counter voucher cannot be deleted.
    #[error("Cash advance {0} has a counter voucher")]
    HasCounterVoucher(CashAdvanceId),

    /// Creating the counter voucher failed.
    #[error("Counter voucher rejected: {0}")]
    CounterVoucher(#[from] VoucherError),
}

impl CashAdvanceError {
    /// Returns the error category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) | Self::PartialNotFound(_) => ErrorKind::NotFound,

            Self::InvalidAmount(_)
            | Self::AmountOutOfRange(_)
            | Self::NegativeSettlement(_)
            | Self::EmptyField(_)
            | Self::MissingCounterClassification => ErrorKind::Validation,

            Self::DuplicateOrderNo(_) => ErrorKind::Conflict,

            Self::AlreadyResolved(_)
            | Self::UnsettledPartialsRemain { .. }
            | Self::ExceedsPlannedRemaining { .. }
            | Self::SettledPartialDeletionDenied(_)
            | Self::PartialAlreadySettled(_)
            | Self::HasCounterVoucher(_) => ErrorKind::State,

            Self::CounterVoucher(e) => e.kind(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        self.kind().http_status_code()
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "CASH_ADVANCE_NOT_FOUND",
            Self::PartialNotFound(_) => "PARTIAL_NOT_FOUND",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::AmountOutOfRange(_) => "AMOUNT_OUT_OF_RANGE",
            Self::NegativeSettlement(_) => "NEGATIVE_SETTLEMENT",
            Self::EmptyField(_) => "EMPTY_FIELD",
            Self::DuplicateOrderNo(_) => "DUPLICATE_ORDER_NO",
            Self::AlreadyResolved(_) => "ALREADY_RESOLVED",
            Self::UnsettledPartialsRemain { .. } => "UNSETTLED_PARTIALS_REMAIN",
            Self::ExceedsPlannedRemaining { .. } => "EXCEEDS_PLANNED_REMAINING",
            Self::SettledPartialDeletionDenied(_) => "SETTLED_PARTIAL_DELETION_DENIED",
            Self::PartialAlreadySettled(_) => "PARTIAL_ALREADY_SETTLED",
            Self::MissingCounterClassification => "MISSING_COUNTER_CLASSIFICATION",
            Self::HasCounterVoucher(_) => "HAS_COUNTER_VOUCHER",
            Self::CounterVoucher(e) => e.error_code(),
        }
    }
}
