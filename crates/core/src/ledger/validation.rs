//! Entry normalization.
//!
//! Checks run in a fixed order so the reported error is stable:
//! side, amount finiteness, amount sign, currency.

use rust_decimal::Decimal;
use tally_shared::types::CurrencyCode;

use super::entry::{Amount, CoercionError, LedgerEntry, NormalizedLedgerEntry, Side};
use super::error::LedgerError;
use super::types::DEFAULT_ZERO_TOLERANCE;

/// Validates and canonicalizes one raw entry.
///
/// `zero_tolerance` overrides [`DEFAULT_ZERO_TOLERANCE`] (its absolute value
/// is used) when deciding `is_zero` on the result. The input is never
/// modified.
///
/// # Errors
///
/// - `InvalidSide` if `side` is not exactly `debit` or `credit`
/// - `NonFiniteAmount` if the amount is not a finite number
/// - `AmountOutOfRange` if the amount is too large to represent
/// - `NegativeAmount` if the amount is below zero
/// - `EmptyCurrency` if the currency is blank after trimming
pub fn normalize_entry(
    entry: &LedgerEntry,
    zero_tolerance: Option<Decimal>,
) -> Result<NormalizedLedgerEntry, LedgerError> {
    let tolerance = zero_tolerance.map_or(DEFAULT_ZERO_TOLERANCE, |t| t.abs());

    let side: Side = entry
        .side
        .parse()
        .map_err(|_| LedgerError::InvalidSide {
            id: entry.id.clone(),
            side: entry.side.clone(),
        })?;

    let value = entry.amount.coerce().map_err(|e| match e {
        CoercionError::NotANumber => LedgerError::NonFiniteAmount {
            id: entry.id.clone(),
        },
        CoercionError::OutOfRange => LedgerError::AmountOutOfRange {
            id: entry.id.clone(),
        },
    })?;

    let amount = Amount::new(value).map_err(|e| LedgerError::NegativeAmount {
        id: entry.id.clone(),
        amount: e.0,
    })?;

    let currency = CurrencyCode::parse(&entry.currency).map_err(|_| LedgerError::EmptyCurrency)?;

    Ok(NormalizedLedgerEntry {
        id: entry.id.clone(),
        account: entry.account.clone(),
        amount,
        currency,
        side,
        posted_at: entry.posted_at.clone(),
        description: entry.description.clone(),
        metadata: entry.metadata.clone(),
        is_zero: amount.value() <= tolerance,
    })
}
