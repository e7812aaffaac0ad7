//! Effective exchange-rate table.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tally_shared::types::CurrencyCode;

use crate::ledger::entry::RawAmount;
use crate::ledger::error::LedgerError;

/// Rates into a single base currency.
///
/// Built from caller-supplied rates with keys canonicalized. The base
/// currency always converts at exactly 1, whatever the caller supplied for
/// it. Rate values are validated on lookup, so a bad rate for a currency no
/// entry uses is never reported.
#[derive(Debug, Clone)]
pub struct RateTable {
    base: CurrencyCode,
    rates: BTreeMap<CurrencyCode, RawAmount>,
}

impl RateTable {
    /// Builds the effective table for `base`.
    ///
    /// Blank keys are ignored. When two keys canonicalize to the same code,
    /// the one already in canonical form wins.
    #[must_use]
    pub fn new(base: CurrencyCode, fx_rates: &BTreeMap<String, RawAmount>) -> Self {
        let (canonical, other): (Vec<_>, Vec<_>) = fx_rates
            .iter()
            .partition(|(key, _)| CurrencyCode::is_canonical(key));

        let mut rates = BTreeMap::new();
        for (key, rate) in other.into_iter().chain(canonical) {
            if let Ok(code) = CurrencyCode::parse(key) {
                rates.insert(code, rate.clone());
            }
        }
        rates.insert(base.clone(), RawAmount::Exact(Decimal::ONE));

        Self { base, rates }
    }

    /// The base currency.
    #[must_use]
    pub fn base(&self) -> &CurrencyCode {
        &self.base
    }

    /// Looks up the rate converting one unit of `currency` into the base.
    ///
    /// # Errors
    ///
    /// Returns `NoExchangeRate` if no rate is present and
    /// `InvalidExchangeRate` if the rate is not a finite positive number.
    pub fn rate(&self, currency: &CurrencyCode) -> Result<Decimal, LedgerError> {
        if currency == &self.base {
            return Ok(Decimal::ONE);
        }

        let raw = self
            .rates
            .get(currency)
            .ok_or_else(|| LedgerError::NoExchangeRate {
                currency: currency.clone(),
                base: self.base.clone(),
            })?;

        match raw.coerce() {
            Ok(rate) if rate > Decimal::ZERO => Ok(rate),
            _ => Err(LedgerError::InvalidExchangeRate {
                currency: currency.clone(),
            }),
        }
    }

    /// Expresses `amount` of `currency` in the base currency.
    ///
    /// Base-currency amounts come back unchanged without a lookup.
    ///
    /// # Errors
    ///
    /// Propagates rate lookup errors; returns `Overflow` if the product does
    /// not fit.
    pub fn to_base(&self, amount: Decimal, currency: &CurrencyCode) -> Result<Decimal, LedgerError> {
        if currency == &self.base {
            return Ok(amount);
        }
        let rate = self.rate(currency)?;
        amount
            .checked_mul(rate)
            .ok_or_else(|| LedgerError::Overflow {
                currency: currency.clone(),
            })
    }
}
