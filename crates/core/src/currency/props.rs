//! Property-based tests for currency operations.
//!
//! - Property 1: Rounding is deterministic and bounded
//! - Property 2: Base-currency conversion is the identity
//! - Property 3: Foreign conversion is amount times rate

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::service::CurrencyService;
use crate::ledger::entry::RawAmount;
use crate::ledger::types::LedgerSummaryOptions;

/// Strategy to generate amounts with up to 6 decimal places (0 to 1,000,000).
fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000_000_000i64).prop_map(|micros| Decimal::new(micros, 6))
}

/// Strategy to generate signed values with up to 6 decimal places.
fn signed_value() -> impl Strategy<Value = Decimal> {
    (-1_000_000_000_000i64..1_000_000_000_000i64).prop_map(|micros| Decimal::new(micros, 6))
}

/// Strategy to generate positive exchange rates (0.0001 to 10000.0000).
fn positive_rate() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

/// Strategy to generate precisions (0 to 6).
fn precision() -> impl Strategy<Value = u32> {
    0u32..=6
}

/// Strategy to generate spellings of the base currency.
fn usd_spelling() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("USD"), Just("usd"), Just(" Usd "), Just("\tUSD")]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // =========================================================================
    // Property 1: Rounding
    // =========================================================================

    /// Property 1.1: Rounding the same value twice gives the same result.
    #[test]
    fn prop_round_is_deterministic(value in signed_value(), precision in precision()) {
        prop_assert_eq!(
            CurrencyService::round(value, precision),
            CurrencyService::round(value, precision)
        );
    }

    /// Property 1.2: The result has exactly `precision` decimal places.
    #[test]
    fn prop_round_has_requested_scale(value in signed_value(), precision in precision()) {
        prop_assert_eq!(CurrencyService::round(value, precision).scale(), precision);
    }

    /// Property 1.3: The result is within half a unit of the input.
    #[test]
    fn prop_round_error_is_bounded(value in signed_value(), precision in precision()) {
        let half_unit = Decimal::new(5, precision + 1);
        let rounded = CurrencyService::round(value, precision);
        prop_assert!((rounded - value).abs() <= half_unit);
    }

    /// Property 1.4: Rounding is symmetric around zero.
    #[test]
    fn prop_round_is_symmetric(value in signed_value(), precision in precision()) {
        prop_assert_eq!(
            CurrencyService::round(-value, precision),
            -CurrencyService::round(value, precision)
        );
    }

    /// Property 1.5: Rounding an already-rounded value is a no-op.
    #[test]
    fn prop_round_is_idempotent(value in signed_value(), precision in precision()) {
        let once = CurrencyService::round(value, precision);
        prop_assert_eq!(CurrencyService::round(once, precision), once);
    }

    // =========================================================================
    // Property 2: Identity conversion
    // =========================================================================

    /// Property 2.1: Converting from the base currency returns the amount
    /// unchanged, whatever rate is supplied for the base currency.
    #[test]
    fn prop_base_conversion_is_identity(
        value in amount(),
        rate in positive_rate(),
        base in usd_spelling(),
        source in usd_spelling(),
    ) {
        let options = LedgerSummaryOptions::new(base).with_rate("USD", rate);
        let converted = CurrencyService::convert(&RawAmount::from(value), source, &options).unwrap();
        prop_assert_eq!(converted, value);
    }

    // =========================================================================
    // Property 3: Foreign conversion
    // =========================================================================

    /// Property 3.1: Converting a foreign amount multiplies by its rate.
    #[test]
    fn prop_foreign_conversion_multiplies(value in amount(), rate in positive_rate()) {
        let options = LedgerSummaryOptions::new("USD").with_rate("EUR", rate);
        let converted = CurrencyService::convert(&RawAmount::from(value), "eur", &options).unwrap();
        prop_assert_eq!(converted, value * rate);
    }

    /// Property 3.2: Non-positive rates are always rejected.
    #[test]
    fn prop_non_positive_rate_rejected(value in amount(), rate in -10_000i64..=0) {
        let options = LedgerSummaryOptions::new("USD").with_rate("EUR", Decimal::new(rate, 2));
        let err = CurrencyService::convert(&RawAmount::from(value), "EUR", &options).unwrap_err();
        prop_assert!(err.is_range_error());
    }
}
