//! Budget error types.

use chrono::NaiveDate;
use kassenwart_shared::{BudgetId, ErrorKind};
use rust_decimal::Decimal;
use thiserror::Error;

/// Budget-related errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BudgetError {
    /// Budget not found.
    #[error("Budget not found: {0}")]
    NotFound(BudgetId),

    /// Planned amount cannot be negative.
    #[error("Planned amount cannot be negative")]
    NegativeAmount,

    /// Planned amount above the maximum or finer than cents.
    #[error("Planned amount {0} must be whole cents and at most 1000000000000")]
    AmountOutOfRange(Decimal),

    /// Start date lies after end date.
    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange {
        /// Range start.
        start: NaiveDate,
        /// Range end.
        end: NaiveDate,
    },

    /// An enforced time range needs both bounds.
    #[error("Enforced time range requires both start and end date")]
    MissingDateRange,

    /// Year out of the supported range.
    #[error("Invalid budget year: {0}")]
    InvalidYear(i32),

    /// Vouchers still allocate to this budget.
    #[error("Budget {budget_id} is referenced by {vouchers} voucher(s)")]
    InUse {
        /// The budget.
        budget_id: BudgetId,
        /// Number of referencing vouchers.
        vouchers: usize,
    },
}

impl BudgetError {
    /// Returns the error category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::InUse { .. } => ErrorKind::State,
            Self::NegativeAmount
            | Self::AmountOutOfRange(_)
            | Self::InvalidDateRange { .. }
            | Self::MissingDateRange
            | Self::InvalidYear(_) => ErrorKind::Validation,
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
            Self::NotFound(_) => "BUDGET_NOT_FOUND",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::AmountOutOfRange(_) => "AMOUNT_OUT_OF_RANGE",
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            Self::MissingDateRange => "MISSING_DATE_RANGE",
            Self::InvalidYear(_) => "INVALID_YEAR",
            Self::InUse { .. } => "BUDGET_IN_USE",
        }
    }
}
