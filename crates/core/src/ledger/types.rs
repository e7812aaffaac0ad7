//! Summarization options and results.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use tally_shared::types::CurrencyCode;

use super::entry::{NormalizedLedgerEntry, RawAmount};
use super::error::LedgerError;
use crate::currency::RateTable;

/// Decimal places used when none (or an invalid value) is supplied.
pub const DEFAULT_PRECISION: u32 = 2;

/// Largest precision `Decimal` can represent.
pub const MAX_PRECISION: u32 = 28;

/// Magnitude at or below which an entry counts as zero, when unset.
pub const DEFAULT_ZERO_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 9);

/// Caller-supplied summarization options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSummaryOptions {
    /// Currency all base totals are expressed in.
    #[serde(default)]
    pub base_currency: String,
    /// Multiplicative rates converting one unit of a currency into the base
    /// currency. A rate for the base currency itself is ignored.
    #[serde(default)]
    pub fx_rates: BTreeMap<String, RawAmount>,
    /// Decimal places for rounded output. Negative, fractional or non-numeric
    /// values are treated as unset.
    #[serde(default, deserialize_with = "lenient_precision")]
    pub precision: Option<u32>,
    /// Zero tolerance override; its absolute value is used.
    #[serde(default)]
    pub zero_tolerance: Option<Decimal>,
    /// Balance tolerance override; its absolute value is used. Falls back to
    /// the zero tolerance.
    #[serde(default)]
    pub balance_tolerance: Option<Decimal>,
    /// Fail instead of reporting when the imbalance exceeds the tolerance.
    #[serde(default)]
    pub enforce_balance: bool,
}

fn lenient_precision<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(serde_json::Value::as_u64)
        .and_then(|p| u32::try_from(p).ok()))
}

impl LedgerSummaryOptions {
    /// Creates options for a base currency with everything else defaulted.
    #[must_use]
    pub fn new(base_currency: impl Into<String>) -> Self {
        Self {
            base_currency: base_currency.into(),
            ..Self::default()
        }
    }

    /// Adds an exchange rate.
    #[must_use]
    pub fn with_rate(mut self, currency: impl Into<String>, rate: impl Into<RawAmount>) -> Self {
        self.fx_rates.insert(currency.into(), rate.into());
        self
    }

    /// Sets the output precision.
    #[must_use]
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = Some(precision);
        self
    }

    /// Sets the zero tolerance.
    #[must_use]
    pub fn with_zero_tolerance(mut self, tolerance: Decimal) -> Self {
        self.zero_tolerance = Some(tolerance);
        self
    }

    /// Sets the balance tolerance.
    #[must_use]
    pub fn with_balance_tolerance(mut self, tolerance: Decimal) -> Self {
        self.balance_tolerance = Some(tolerance);
        self
    }

    /// Turns balance enforcement on or off.
    #[must_use]
    pub fn enforce_balance(mut self, enforce: bool) -> Self {
        self.enforce_balance = enforce;
        self
    }
}

/// Options with every default applied and the rate table built.
#[derive(Debug, Clone)]
pub struct ResolvedOptions {
    /// Canonical base currency.
    pub base_currency: CurrencyCode,
    /// Effective rates, base currency pinned to 1.
    pub rates: RateTable,
    /// Output precision.
    pub precision: u32,
    /// Zero tolerance (non-negative).
    pub zero_tolerance: Decimal,
    /// Balance tolerance (non-negative).
    pub balance_tolerance: Decimal,
    /// Whether an imbalance beyond tolerance is an error.
    pub enforce_balance: bool,
}

impl ResolvedOptions {
    /// Applies defaults and canonicalizes the base currency.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::EmptyCurrency` if the base currency is blank.
    pub fn resolve(options: &LedgerSummaryOptions) -> Result<Self, LedgerError> {
        let precision = options
            .precision
            .map_or(DEFAULT_PRECISION, |p| p.min(MAX_PRECISION));
        let zero_tolerance = options
            .zero_tolerance
            .map_or(DEFAULT_ZERO_TOLERANCE, |t| t.abs());
        let balance_tolerance = options
            .balance_tolerance
            .map_or(zero_tolerance, |t| t.abs());

        let base_currency =
            CurrencyCode::parse(&options.base_currency).map_err(|_| LedgerError::EmptyCurrency)?;
        let rates = RateTable::new(base_currency.clone(), &options.fx_rates);

        Ok(Self {
            base_currency,
            rates,
            precision,
            zero_tolerance,
            balance_tolerance,
            enforce_balance: options.enforce_balance,
        })
    }
}

/// Debit, credit and net for one bucket, rounded to the output precision.
///
/// `net` is computed from the already-rounded debit and credit, so
/// `net == debit - credit` holds exactly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideTotals {
    /// Total debits.
    pub debit: Decimal,
    /// Total credits.
    pub credit: Decimal,
    /// Debit minus credit.
    pub net: Decimal,
}

/// Result of summarizing a batch of entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSummary {
    /// Echo of the canonical base currency.
    pub base_currency: CurrencyCode,
    /// Totals per native currency, not converted.
    pub totals_by_currency: BTreeMap<CurrencyCode, SideTotals>,
    /// Totals converted into the base currency.
    pub base_totals: SideTotals,
    /// `base_totals.debit - base_totals.credit`.
    pub imbalance: Decimal,
    /// Whether `|imbalance|` is within the balance tolerance.
    pub balanced: bool,
    /// Entries excluded from all totals because they were within the zero
    /// tolerance, in input order.
    pub zero_entries: Vec<NormalizedLedgerEntry>,
}
