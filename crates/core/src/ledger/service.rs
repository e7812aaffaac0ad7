//! Ledger service for batch summarization.
//!
//! This module provides the orchestration on top of normalization, rate
//! lookup and accumulation: it resolves options, folds every entry into an
//! [`Accumulator`], rounds, and applies balance enforcement.

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::balance::Accumulator;
use super::entry::{LedgerEntry, NormalizedLedgerEntry};
use super::error::LedgerError;
use super::types::{LedgerSummary, LedgerSummaryOptions, ResolvedOptions};
use super::validation;

/// Ledger service for summarizing batches of entries.
///
/// This service contains pure business logic with no I/O. Every call
/// allocates its own state and never mutates its inputs, so it can be used
/// from any number of threads at once.
pub struct LedgerService;

impl LedgerService {
    /// Summarize a batch of typed entries.
    ///
    /// Steps:
    /// 1. Resolves precision, tolerances and the rate table
    /// 2. Normalizes each entry in input order
    /// 3. Sets zero entries aside; adds the rest to native and base totals
    /// 4. Rounds every bucket, then derives `net` and `imbalance`
    /// 5. Fails if balance is enforced and the imbalance exceeds tolerance
    ///
    /// The first failing entry aborts the whole batch; no partial summary is
    /// ever returned. Entries without an id are named by their index in
    /// errors.
    ///
    /// # Errors
    ///
    /// Returns the first `LedgerError` met, or `Unbalanced` when enforcement
    /// is on and the ledger does not balance.
    pub fn summarize(
        entries: &[LedgerEntry],
        options: &LedgerSummaryOptions,
    ) -> Result<LedgerSummary, LedgerError> {
        let resolved = ResolvedOptions::resolve(options)?;

        let accumulator = entries
            .iter()
            .enumerate()
            .try_fold(Accumulator::new(), |acc, (index, entry)| {
                Self::absorb(acc, index, entry, &resolved)
            })?;

        Self::complete(accumulator, entries.len(), &resolved)
    }

    /// Summarize a dynamically shaped request.
    ///
    /// The request must be an object of the form
    /// `{ "entries": [...], "options": {...} }`. Entries are read one at a
    /// time during the fold, so errors are reported in input order.
    ///
    /// # Errors
    ///
    /// - `EntriesNotSequence` if `entries` is missing or not an array
    /// - `MissingOptions` if `options` is missing or null
    /// - `MalformedOptions` if `options` cannot be read
    /// - `EntryNotRecord` for an element that is not an object
    /// - `MalformedEntry` for an object that cannot be read as an entry
    /// - anything [`Self::summarize`] can return
    pub fn summarize_json(request: &Value) -> Result<LedgerSummary, LedgerError> {
        let entries = request
            .get("entries")
            .and_then(Value::as_array)
            .ok_or(LedgerError::EntriesNotSequence)?;

        let options = match request.get("options") {
            None | Some(Value::Null) => return Err(LedgerError::MissingOptions),
            Some(options) => LedgerSummaryOptions::deserialize(options)
                .map_err(|e| LedgerError::MalformedOptions(e.to_string()))?,
        };
        let resolved = ResolvedOptions::resolve(&options)?;

        let accumulator = entries.iter().enumerate().try_fold(
            Accumulator::new(),
            |acc, (index, value)| {
                let entry = parse_entry(index, value)?;
                Self::absorb(acc, index, &entry, &resolved)
            },
        )?;

        Self::complete(accumulator, entries.len(), &resolved)
    }

    /// Normalize a single entry with an optional zero-tolerance override.
    ///
    /// See [`validation::normalize_entry`].
    ///
    /// # Errors
    ///
    /// Returns a `LedgerError` describing the first failed check.
    pub fn normalize_entry(
        entry: &LedgerEntry,
        zero_tolerance: Option<Decimal>,
    ) -> Result<NormalizedLedgerEntry, LedgerError> {
        validation::normalize_entry(entry, zero_tolerance)
    }

    fn absorb(
        acc: Accumulator,
        index: usize,
        entry: &LedgerEntry,
        resolved: &ResolvedOptions,
    ) -> Result<Accumulator, LedgerError> {
        let normalized = validation::normalize_entry(entry, Some(resolved.zero_tolerance))
            .map_err(|e| e.at_position(index))?;
        acc.absorb(normalized, &resolved.rates)
    }

    fn complete(
        accumulator: Accumulator,
        entry_count: usize,
        resolved: &ResolvedOptions,
    ) -> Result<LedgerSummary, LedgerError> {
        let summary = accumulator.finish(resolved);

        if resolved.enforce_balance && !summary.balanced {
            tracing::warn!(
                imbalance = %summary.imbalance,
                base_currency = %summary.base_currency,
                tolerance = %resolved.balance_tolerance,
                "Rejecting unbalanced ledger"
            );
            return Err(LedgerError::Unbalanced {
                imbalance: summary.imbalance,
                base_currency: summary.base_currency,
                tolerance: resolved.balance_tolerance,
            });
        }

        tracing::debug!(
            entries = entry_count,
            zero_entries = summary.zero_entries.len(),
            currencies = summary.totals_by_currency.len(),
            imbalance = %summary.imbalance,
            balanced = summary.balanced,
            "Ledger summarized"
        );
        Ok(summary)
    }
}

fn parse_entry(index: usize, value: &Value) -> Result<LedgerEntry, LedgerError> {
    let Some(record) = value.as_object() else {
        return Err(LedgerError::EntryNotRecord { index });
    };
    LedgerEntry::deserialize(value).map_err(|e| LedgerError::MalformedEntry {
        entry: describe_record(record, index),
        reason: e.to_string(),
    })
}

/// The record's id when it has a usable one, else its position.
fn describe_record(record: &Map<String, Value>, index: usize) -> String {
    match record.get("id") {
        Some(Value::String(id)) => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => format!("at index {index}"),
    }
}
