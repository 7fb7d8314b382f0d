//! Property-based tests for amount derivation.
//!
//! - Property 1: Zero-rate identity
//! - Property 2: NET gross formula
//! - Property 3: VAT decomposition

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::calculator::AmountCalculator;
use super::types::{AmountInput, TaxMode, VatRate};

/// Strategy to generate positive cent amounts (0.01 to 1,000,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn vat_rate() -> impl Strategy<Value = VatRate> {
    prop_oneof![
        Just(VatRate::Zero),
        Just(VatRate::Reduced),
        Just(VatRate::Standard),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property 1.1: gross equals net when the rate is 0.
    #[test]
    fn prop_zero_rate_gross_equals_net(net in positive_amount()) {
        let amounts = AmountCalculator::calculate(&AmountInput::Net {
            net,
            vat_rate: VatRate::Zero,
        })
        .unwrap();
        prop_assert_eq!(amounts.gross_amount, amounts.net_amount);
        prop_assert_eq!(amounts.vat_amount, Decimal::ZERO);
    }

    /// Property 2.1: at 19 % gross is net * 1.19 rounded to cents.
    #[test]
    fn prop_standard_rate_formula(net in positive_amount()) {
        let amounts = AmountCalculator::calculate(&AmountInput::Net {
            net,
            vat_rate: VatRate::Standard,
        })
        .unwrap();
        let expected = (net * Decimal::new(119, 2)).round_dp_with_strategy(
            2,
            rust_decimal::RoundingStrategy::MidpointAwayFromZero,
        );
        prop_assert_eq!(amounts.gross_amount, expected);
    }

    /// Property 3.1: net + vat always reconstructs gross, gross has at most 2 dp.
    #[test]
    fn prop_vat_decomposition(net in positive_amount(), rate in vat_rate()) {
        let amounts =
            AmountCalculator::calculate(&AmountInput::Net { net, vat_rate: rate }).unwrap();
        prop_assert_eq!(amounts.net_amount + amounts.vat_amount, amounts.gross_amount);
        prop_assert!(amounts.gross_amount >= amounts.net_amount);
        prop_assert!(amounts.gross_amount.scale() <= 2);
    }

    /// Property 3.2: GROSS mode never splits out VAT.
    #[test]
    fn prop_gross_mode_has_no_vat(gross in positive_amount()) {
        let amounts = AmountCalculator::calculate(&AmountInput::Gross { gross }).unwrap();
        prop_assert_eq!(amounts.tax_mode, TaxMode::Gross);
        prop_assert_eq!(amounts.vat_rate, VatRate::Zero);
        prop_assert_eq!(amounts.net_amount, gross);
    }

    /// Property 3.3: switching NET to GROSS preserves the gross figure.
    #[test]
    fn prop_switch_to_gross_preserves_gross(net in positive_amount(), rate in vat_rate()) {
        let current =
            AmountCalculator::calculate(&AmountInput::Net { net, vat_rate: rate }).unwrap();
        let switched = AmountCalculator::calculate(
            &AmountCalculator::switch_mode(&current, TaxMode::Gross, None),
        ).unwrap();
        prop_assert_eq!(switched.gross_amount, current.gross_amount);
    }
}
