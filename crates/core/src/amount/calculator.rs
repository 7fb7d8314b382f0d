//! Amount calculator.

use rust_decimal::{Decimal, RoundingStrategy};

use super::error::AmountError;
use super::types::{AmountInput, Amounts, TaxMode, VatRate};

/// Decimal places of stored money amounts.
pub const MONEY_DP: u32 = 2;

/// Largest accepted money amount (one trillion).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// Pure functions deriving gross/net/VAT figures.
pub struct AmountCalculator;

impl AmountCalculator {
    /// Rounds to cents, half away from zero.
    #[must_use]
    pub fn round_money(amount: Decimal) -> Decimal {
        amount.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Whether `amount` lies within `-MAX_AMOUNT..=MAX_AMOUNT`.
    #[must_use]
    pub fn in_range(amount: Decimal) -> bool {
        amount.abs() <= MAX_AMOUNT
    }

    /// Whether `amount` has no digits below cents.
    #[must_use]
    pub fn is_cents(amount: Decimal) -> bool {
        amount.normalize().scale() <= MONEY_DP
    }

    /// Computes `round(net * (1 + rate / 100), 2)`.
    #[must_use]
    pub fn gross_from_net(net: Decimal, vat_rate: VatRate) -> Decimal {
        Self::round_money(net * vat_rate.factor())
    }

    /// Derives all amounts from the authoritative input.
    ///
    /// # Errors
    ///
    /// Returns `AmountError::NonPositive` if the entered figure is not > 0
    /// and `AmountError::OutOfRange` if it exceeds [`MAX_AMOUNT`].
    pub fn calculate(input: &AmountInput) -> Result<Amounts, AmountError> {
        match *input {
            AmountInput::Net { net, vat_rate } => {
                Self::check_bounds(net)?;
                let gross_amount = Self::gross_from_net(net, vat_rate);
                Ok(Amounts {
                    tax_mode: TaxMode::Net,
                    net_amount: net,
                    vat_rate,
                    vat_amount: gross_amount - net,
                    gross_amount,
                })
            }
            AmountInput::Gross { gross } => Self::gross_only(gross),
        }
    }

    /// Amounts for a transfer: single figure, no VAT.
    ///
    /// # Errors
    ///
    /// Returns `AmountError::NonPositive` or `AmountError::OutOfRange`.
    pub fn transfer(amount: Decimal) -> Result<Amounts, AmountError> {
        Self::gross_only(amount)
    }

    fn check_bounds(amount: Decimal) -> Result<(), AmountError> {
        if amount <= Decimal::ZERO {
            return Err(AmountError::NonPositive(amount));
        }
        if amount > MAX_AMOUNT {
            return Err(AmountError::OutOfRange(amount));
        }
        Ok(())
    }

    fn gross_only(gross: Decimal) -> Result<Amounts, AmountError> {
        Self::check_bounds(gross)?;
        Ok(Amounts {
            tax_mode: TaxMode::Gross,
            net_amount: gross,
            vat_rate: VatRate::Zero,
            vat_amount: Decimal::ZERO,
            gross_amount: gross,
        })
    }

    /// Builds the input for a mode switch from the currently held amounts.
    ///
    /// NET to GROSS keeps the derived gross figure. GROSS to NET carries the
    /// gross figure over as net, at `vat_rate` if one is given and 0 % otherwise.
    /// Switching to the mode already in use only applies a new rate, if any.
    #[must_use]
    pub fn switch_mode(
        current: &Amounts,
        target: TaxMode,
        vat_rate: Option<VatRate>,
    ) -> AmountInput {
        match (current.tax_mode, target) {
            (TaxMode::Net, TaxMode::Gross) => AmountInput::Gross {
                gross: Self::gross_from_net(current.net_amount, current.vat_rate),
            },
            (TaxMode::Gross, TaxMode::Net) => AmountInput::Net {
                net: current.gross_amount,
                vat_rate: vat_rate.unwrap_or_default(),
            },
            (TaxMode::Net, TaxMode::Net) => AmountInput::Net {
                net: current.net_amount,
                vat_rate: vat_rate.unwrap_or(current.vat_rate),
            },
            (TaxMode::Gross, TaxMode::Gross) => AmountInput::Gross {
                gross: current.gross_amount,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_net_mode_standard_rate() {
        let amounts = AmountCalculator::calculate(&AmountInput::Net {
            net: dec!(100),
            vat_rate: VatRate::Standard,
        })
        .unwrap();

        assert_eq!(amounts.gross_amount, dec!(119.00));
        assert_eq!(amounts.vat_amount, dec!(19.00));
        assert_eq!(amounts.net_amount, dec!(100));
        assert_eq!(amounts.tax_mode, TaxMode::Net);
    }

    #[rstest]
    #[case(dec!(10.05), VatRate::Standard, dec!(11.96))]
    #[case(dec!(0.50), VatRate::Reduced, dec!(0.54))]
    #[case(dec!(12.34), VatRate::Zero, dec!(12.34))]
    #[case(dec!(0.05), VatRate::Reduced, dec!(0.05))]
    fn test_gross_from_net_rounds_half_up(
        #[case] net: Decimal,
        #[case] rate: VatRate,
        #[case] gross: Decimal,
    ) {
        assert_eq!(AmountCalculator::gross_from_net(net, rate), gross);
    }

    #[test]
    fn test_half_cent_rounds_away_from_zero() {
        // 1.50 * 1.07 = 1.605
        assert_eq!(
            AmountCalculator::gross_from_net(dec!(1.50), VatRate::Reduced),
            dec!(1.61)
        );
    }

    #[test]
    fn test_gross_mode_forces_zero_vat() {
        let amounts =
            AmountCalculator::calculate(&AmountInput::Gross { gross: dec!(59.90) }).unwrap();

        assert_eq!(amounts.gross_amount, dec!(59.90));
        assert_eq!(amounts.net_amount, dec!(59.90));
        assert_eq!(amounts.vat_rate, VatRate::Zero);
        assert_eq!(amounts.vat_amount, Decimal::ZERO);
    }

    #[test]
    fn test_non_positive_rejected() {
        assert_eq!(
            AmountCalculator::calculate(&AmountInput::Gross { gross: dec!(0) }),
            Err(AmountError::NonPositive(dec!(0)))
        );
        assert_eq!(
            AmountCalculator::calculate(&AmountInput::Net {
                net: dec!(-1),
                vat_rate: VatRate::Zero
            }),
            Err(AmountError::NonPositive(dec!(-1)))
        );
        assert!(AmountCalculator::transfer(dec!(0)).is_err());
    }

    #[test]
    fn test_amount_above_maximum_rejected() {
        assert_eq!(
            AmountCalculator::calculate(&AmountInput::Gross {
                gross: Decimal::MAX
            }),
            Err(AmountError::OutOfRange(Decimal::MAX))
        );
        assert_eq!(
            AmountCalculator::calculate(&AmountInput::Net {
                net: Decimal::MAX,
                vat_rate: VatRate::Standard
            }),
            Err(AmountError::OutOfRange(Decimal::MAX))
        );
        assert_eq!(
            AmountCalculator::transfer(MAX_AMOUNT + dec!(0.01)),
            Err(AmountError::OutOfRange(MAX_AMOUNT + dec!(0.01)))
        );

        let largest = AmountCalculator::calculate(&AmountInput::Net {
            net: MAX_AMOUNT,
            vat_rate: VatRate::Standard,
        })
        .unwrap();
        assert_eq!(largest.gross_amount, dec!(1190000000000.00));
    }

    #[rstest]
    #[case(dec!(12.34), true)]
    #[case(dec!(12.3400), true)]
    #[case(dec!(12.345), false)]
    fn test_is_cents(#[case] amount: Decimal, #[case] expected: bool) {
        assert_eq!(AmountCalculator::is_cents(amount), expected);
    }

    #[test]
    fn test_transfer_has_no_vat() {
        let amounts = AmountCalculator::transfer(dec!(250)).unwrap();
        assert_eq!(amounts.gross_amount, dec!(250));
        assert_eq!(amounts.vat_rate, VatRate::Zero);
        assert_eq!(amounts.vat_amount, Decimal::ZERO);
    }

    #[test]
    fn test_switch_net_to_gross_keeps_gross() {
        let current = AmountCalculator::calculate(&AmountInput::Net {
            net: dec!(100),
            vat_rate: VatRate::Standard,
        })
        .unwrap();

        let input = AmountCalculator::switch_mode(&current, TaxMode::Gross, None);
        assert_eq!(input, AmountInput::Gross { gross: dec!(119.00) });
    }

    #[test]
    fn test_switch_gross_to_net_carries_figure() {
        let current = AmountCalculator::calculate(&AmountInput::Gross { gross: dec!(80) }).unwrap();

        let input = AmountCalculator::switch_mode(&current, TaxMode::Net, Some(VatRate::Reduced));
        assert_eq!(
            input,
            AmountInput::Net {
                net: dec!(80),
                vat_rate: VatRate::Reduced
            }
        );

        let input = AmountCalculator::switch_mode(&current, TaxMode::Net, None);
        assert_eq!(
            input,
            AmountInput::Net {
                net: dec!(80),
                vat_rate: VatRate::Zero
            }
        );
    }

    #[test]
    fn test_switch_same_mode_changes_rate_only() {
        let current = AmountCalculator::calculate(&AmountInput::Net {
            net: dec!(10),
            vat_rate: VatRate::Reduced,
        })
        .unwrap();

        let input = AmountCalculator::switch_mode(&current, TaxMode::Net, Some(VatRate::Standard));
        assert_eq!(
            input,
            AmountInput::Net {
                net: dec!(10),
                vat_rate: VatRate::Standard
            }
        );
        assert_eq!(current.input(), AmountCalculator::switch_mode(&current, TaxMode::Net, None));
    }
}
