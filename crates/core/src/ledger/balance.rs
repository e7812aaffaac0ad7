//! Running totals for summarization.
//!
//! The summary is a fold: an [`Accumulator`] is consumed by each step and a
//! new one is returned, so nothing is shared or mutated behind the caller's
//! back. Sums are exact decimals; rounding only happens in
//! [`Accumulator::finish`].

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tally_shared::types::CurrencyCode;

use super::entry::{NormalizedLedgerEntry, Side};
use super::error::LedgerError;
use super::types::{LedgerSummary, ResolvedOptions, SideTotals};
use crate::currency::{CurrencyService, RateTable};

/// Unrounded debit and credit sums for one bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunningTotals {
    /// Sum of debits.
    pub debit: Decimal,
    /// Sum of credits.
    pub credit: Decimal,
}

impl RunningTotals {
    /// Adds `amount` to the bucket selected by `side`.
    ///
    /// # Errors
    ///
    /// Returns `Overflow` (naming `currency`) if the sum does not fit.
    pub fn post(
        self,
        side: Side,
        amount: Decimal,
        currency: &CurrencyCode,
    ) -> Result<Self, LedgerError> {
        let overflow = || LedgerError::Overflow {
            currency: currency.clone(),
        };
        Ok(match side {
            Side::Debit => Self {
                debit: self.debit.checked_add(amount).ok_or_else(overflow)?,
                ..self
            },
            Side::Credit => Self {
                credit: self.credit.checked_add(amount).ok_or_else(overflow)?,
                ..self
            },
        })
    }

    /// Adds two buckets together.
    ///
    /// # Errors
    ///
    /// Returns `Overflow` (naming `currency`) if either sum does not fit.
    pub fn combine(self, other: Self, currency: &CurrencyCode) -> Result<Self, LedgerError> {
        self.post(Side::Debit, other.debit, currency)?
            .post(Side::Credit, other.credit, currency)
    }

    /// Rounds both sides and derives `net` from the rounded values.
    #[must_use]
    pub fn finish(self, precision: u32) -> SideTotals {
        let debit = CurrencyService::round(self.debit, precision);
        let credit = CurrencyService::round(self.credit, precision);
        SideTotals {
            debit,
            credit,
            net: debit - credit,
        }
    }
}

/// Fold state for one summarization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Accumulator {
    by_currency: BTreeMap<CurrencyCode, RunningTotals>,
    base: RunningTotals,
    zero_entries: Vec<NormalizedLedgerEntry>,
}

impl Accumulator {
    /// Creates an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one normalized entry in.
    ///
    /// Entries flagged `is_zero` are set aside and touch no total. Others are
    /// added to their native-currency bucket and, converted, to the base
    /// bucket.
    ///
    /// # Errors
    ///
    /// Propagates conversion errors and `Overflow`.
    pub fn absorb(
        mut self,
        entry: NormalizedLedgerEntry,
        rates: &RateTable,
    ) -> Result<Self, LedgerError> {
        if entry.is_zero {
            self.zero_entries.push(entry);
            return Ok(self);
        }

        let amount = entry.amount.value();
        let converted = rates.to_base(amount, &entry.currency)?;

        let native = self
            .by_currency
            .get(&entry.currency)
            .copied()
            .unwrap_or_default()
            .post(entry.side, amount, &entry.currency)?;
        self.base = self.base.post(entry.side, converted, rates.base())?;
        self.by_currency.insert(entry.currency, native);

        Ok(self)
    }

    /// Combines two accumulators built from consecutive slices of a batch.
    ///
    /// `self` must cover the earlier slice so zero entries keep input order.
    ///
    /// # Errors
    ///
    /// Returns `Overflow` if any combined sum does not fit.
    pub fn merge(mut self, other: Self, base: &CurrencyCode) -> Result<Self, LedgerError> {
        for (currency, totals) in other.by_currency {
            let merged = match self.by_currency.get(&currency) {
                Some(existing) => existing.combine(totals, &currency)?,
                None => totals,
            };
            self.by_currency.insert(currency, merged);
        }
        self.base = self.base.combine(other.base, base)?;
        self.zero_entries.extend(other.zero_entries);
        Ok(self)
    }

    /// Number of entries set aside as zero so far.
    #[must_use]
    pub fn zero_entry_count(&self) -> usize {
        self.zero_entries.len()
    }

    /// Rounds everything and produces the summary.
    ///
    /// Balance enforcement is left to the caller; `balanced` records whether
    /// the imbalance is within tolerance.
    #[must_use]
    pub fn finish(self, options: &ResolvedOptions) -> LedgerSummary {
        let totals_by_currency = self
            .by_currency
            .into_iter()
            .map(|(currency, totals)| (currency, totals.finish(options.precision)))
            .collect();
        let base_totals = self.base.finish(options.precision);
        let imbalance = base_totals.net;

        LedgerSummary {
            base_currency: options.base_currency.clone(),
            totals_by_currency,
            base_totals,
            imbalance,
            balanced: imbalance.abs() <= options.balance_tolerance,
            zero_entries: self.zero_entries,
        }
    }
}
