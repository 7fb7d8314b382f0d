//! Amount domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::AmountError;

/// Which figure the user entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaxMode {
    /// Net amount is authoritative, gross is derived.
    Net,
    /// Gross amount is authoritative, no VAT is split out.
    Gross,
}

/// Supported German VAT rates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum VatRate {
    /// 0 %.
    #[default]
    Zero,
    /// 7 % (reduced rate).
    Reduced,
    /// 19 % (standard rate).
    Standard,
}

impl VatRate {
    /// Returns the rate as a whole percentage.
    #[must_use]
    pub const fn as_percent(self) -> u8 {
        match self {
            Self::Zero => 0,
            Self::Reduced => 7,
            Self::Standard => 19,
        }
    }

    /// Returns the multiplier `1 + rate / 100`.
    #[must_use]
    pub fn factor(self) -> Decimal {
        Decimal::ONE + Decimal::from(self.as_percent()) / Decimal::ONE_HUNDRED
    }

    /// Returns true for the 0 % rate.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        matches!(self, Self::Zero)
    }
}

impl TryFrom<u8> for VatRate {
    type Error = AmountError;

    fn try_from(percent: u8) -> Result<Self, Self::Error> {
        match percent {
            0 => Ok(Self::Zero),
            7 => Ok(Self::Reduced),
            19 => Ok(Self::Standard),
            other => Err(AmountError::UnsupportedVatRate(other)),
        }
    }
}

impl From<VatRate> for u8 {
    fn from(rate: VatRate) -> Self {
        rate.as_percent()
    }
}

impl std::fmt::Display for VatRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.as_percent())
    }
}

/// The authoritative figure of a voucher, as entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "UPPERCASE")]
pub enum AmountInput {
    /// Net amount plus VAT rate.
    Net {
        /// Net amount.
        net: Decimal,
        /// VAT rate.
        vat_rate: VatRate,
    },
    /// Gross amount only.
    Gross {
        /// Gross amount.
        gross: Decimal,
    },
}

impl AmountInput {
    /// Returns the tax mode of this input.
    #[must_use]
    pub const fn mode(&self) -> TaxMode {
        match self {
            Self::Net { .. } => TaxMode::Net,
            Self::Gross { .. } => TaxMode::Gross,
        }
    }
}

/// Fully derived voucher amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amounts {
    /// Mode the amounts were entered in.
    pub tax_mode: TaxMode,
    /// Net amount (equals gross in GROSS mode).
    pub net_amount: Decimal,
    /// VAT rate (always 0 in GROSS mode).
    pub vat_rate: VatRate,
    /// VAT amount (gross - net).
    pub vat_amount: Decimal,
    /// Gross amount, the base for allocation bounds.
    pub gross_amount: Decimal,
}

impl Amounts {
    /// Reconstructs the input these amounts were derived from.
    #[must_use]
    pub const fn input(&self) -> AmountInput {
        match self.tax_mode {
            TaxMode::Net => AmountInput::Net {
                net: self.net_amount,
                vat_rate: self.vat_rate,
            },
            TaxMode::Gross => AmountInput::Gross {
                gross: self.gross_amount,
            },
        }
    }
}
