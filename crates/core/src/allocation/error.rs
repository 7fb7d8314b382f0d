//! Allocation error types.

use kassenwart_shared::ErrorKind;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised by allocation validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    /// The same target appears twice in one list.
    #[error("Duplicate allocation target: {0}")]
    DuplicateTarget(i64),

    /// The allocations add up to more than the voucher amount allows.
    #[error("Allocation sum {sum} exceeds voucher total {total}")]
    SumExceedsTotal {
        /// Sum of the positive allocations.
        sum: Decimal,
        /// Voucher gross amount.
        total: Decimal,
    },
}

impl AllocationError {
    /// Returns the error category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
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
            Self::DuplicateTarget(_) => "DUPLICATE_ALLOCATION_TARGET",
            Self::SumExceedsTotal { .. } => "ALLOCATION_SUM_EXCEEDS_TOTAL",
        }
    }
}
