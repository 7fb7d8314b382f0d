//! Amount error types.

use kassenwart_shared::ErrorKind;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised while deriving voucher amounts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// The authoritative amount must be strictly positive.
    #[error("Amount must be positive, got {0}")]
    NonPositive(Decimal),

    /// The amount exceeds the largest accepted figure.
    #[error("Amount {0} exceeds the maximum of 1000000000000")]
    OutOfRange(Decimal),

    /// Only 0, 7 and 19 percent are valid VAT rates.
    #[error("Unsupported VAT rate: {0}%")]
    UnsupportedVatRate(u8),
}

impl AmountError {
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
            Self::NonPositive(_) => "INVALID_AMOUNT",
            Self::OutOfRange(_) => "AMOUNT_OUT_OF_RANGE",
            Self::UnsupportedVatRate(_) => "UNSUPPORTED_VAT_RATE",
        }
    }
}
