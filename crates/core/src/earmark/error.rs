//! Earmark error types.

use kassenwart_shared::{EarmarkId, ErrorKind};
use rust_decimal::Decimal;
use thiserror::Error;

/// Earmark-related errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EarmarkError {
    /// Earmark not found.
    #[error("Earmark not found: {0}")]
    NotFound(EarmarkId),

    /// Budget amount cannot be negative.
    #[error("Earmark budget cannot be negative")]
    NegativeAmount,

    /// Budget amount above the maximum or finer than cents.
    #[error("Earmark budget {0} must be whole cents and at most 1000000000000")]
    AmountOutOfRange(Decimal),

    /// Code must not be blank.
    #[error("Earmark code must not be empty")]
    EmptyCode,

    /// Another earmark already uses this code.
    #[error("Earmark code already exists: {0}")]
    DuplicateCode(String),

    /// Vouchers still allocate to this earmark.
    #[error("Earmark {earmark_id} is referenced by {vouchers} voucher(s)")]
    InUse {
        /// The earmark.
        earmark_id: EarmarkId,
        /// Number of referencing vouchers.
        vouchers: usize,
    },
}

impl EarmarkError {
    /// Returns the error category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::InUse { .. } => ErrorKind::State,
            Self::DuplicateCode(_) => ErrorKind::Conflict,
            Self::NegativeAmount | Self::AmountOutOfRange(_) | Self::EmptyCode => {
                ErrorKind::Validation
            }
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
            Self::NotFound(_) => "EARMARK_NOT_FOUND",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::AmountOutOfRange(_) => "AMOUNT_OUT_OF_RANGE",
            Self::EmptyCode => "EMPTY_CODE",
            Self::DuplicateCode(_) => "DUPLICATE_CODE",
            Self::InUse { .. } => "EARMARK_IN_USE",
        }
    }
}
