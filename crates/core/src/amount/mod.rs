//! Gross/net/VAT derivation.
//!
//! Every non-transfer voucher is entered in one of two tax modes:
//! - NET: net amount plus a VAT rate, gross is derived
//! - GROSS: gross amount only, no VAT decomposition
//!
//! Transfers carry a single amount with no VAT.

pub mod calculator;
pub mod error;
pub mod types;

#[cfg(test)]
mod props;

pub use calculator::{AmountCalculator, MAX_AMOUNT, MONEY_DP};
pub use error::AmountError;
pub use types::{AmountInput, Amounts, TaxMode, VatRate};
