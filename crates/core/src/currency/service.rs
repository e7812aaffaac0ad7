//! Currency service for rounding and conversion.
//!
//! CRITICAL: all money arithmetic is done on `Decimal`. Binary floating
//! point is only accepted at the boundary and is checked and converted once.

use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use tally_shared::types::CurrencyCode;

use crate::ledger::entry::{CoercionError, RawAmount};
use crate::ledger::error::LedgerError;
use crate::ledger::types::{LedgerSummaryOptions, MAX_PRECISION};

use super::rates::RateTable;

/// Currency service for rounding and conversion operations.
///
/// Rounding is "half away from zero" on the exact decimal value
/// (`RoundingStrategy::MidpointAwayFromZero`), so 2.5 becomes 3 and -2.5
/// becomes -3. Results are rescaled to exactly `precision` places so that
/// 100 renders as `100.00`.
pub struct CurrencyService;

impl CurrencyService {
    /// Round a decimal value half away from zero.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use tally_core::currency::CurrencyService;
    ///
    /// assert_eq!(CurrencyService::round(dec!(1.005), 2), dec!(1.01));
    /// assert_eq!(CurrencyService::round(dec!(-2.5), 0), dec!(-3));
    /// ```
    #[must_use]
    pub fn round(value: Decimal, precision: u32) -> Decimal {
        let precision = precision.min(MAX_PRECISION);
        let mut rounded =
            value.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(precision);
        rounded
    }

    /// Round a binary floating-point value.
    ///
    /// The value is first converted to the shortest decimal that round-trips
    /// (so `1.005_f64` is treated as `1.005`), then rounded like
    /// [`Self::round`]. No epsilon nudge is needed.
    ///
    /// # Errors
    ///
    /// Returns `NonFiniteValue` for `NaN` or infinities and `ValueOutOfRange`
    /// for magnitudes `Decimal` cannot hold.
    pub fn round_amount(value: f64, precision: u32) -> Result<Decimal, LedgerError> {
        let exact = RawAmount::Number(value).coerce().map_err(|e| match e {
            CoercionError::NotANumber => LedgerError::NonFiniteValue,
            CoercionError::OutOfRange => LedgerError::ValueOutOfRange,
        })?;
        Ok(Self::round(exact, precision))
    }

    /// Express an amount held in `currency` in the options' base currency.
    ///
    /// Both codes are canonicalized first. When they match, the amount is
    /// returned unchanged and no rate is consulted. The result is not rounded.
    ///
    /// # Errors
    ///
    /// - `NonFiniteValue` / `ValueOutOfRange` if `amount` cannot be coerced
    /// - `EmptyCurrency` if either code is blank
    /// - `NoExchangeRate` / `InvalidExchangeRate` if no usable rate exists
    pub fn convert(
        amount: &RawAmount,
        currency: &str,
        options: &LedgerSummaryOptions,
    ) -> Result<Decimal, LedgerError> {
        let amount = amount.coerce().map_err(|e| match e {
            CoercionError::NotANumber => LedgerError::NonFiniteValue,
            CoercionError::OutOfRange => LedgerError::ValueOutOfRange,
        })?;
        let currency = CurrencyCode::parse(currency).map_err(|_| LedgerError::EmptyCurrency)?;
        let base =
            CurrencyCode::parse(&options.base_currency).map_err(|_| LedgerError::EmptyCurrency)?;

        RateTable::new(base, &options.fx_rates).to_base(amount, &currency)
    }
}
