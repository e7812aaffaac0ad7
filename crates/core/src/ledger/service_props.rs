//! Property-based tests for LedgerService.
//!
//! Feature: ledger-summary
//! - Property 1: Idempotence
//! - Property 2: Balance Identity
//! - Property 3: Zero-Tolerance Partition
//! - Property 4: Fold Associativity
//! - Property 5: Enforcement Consistency

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::balance::Accumulator;
use super::entry::{LedgerEntry, NormalizedLedgerEntry};
use super::error::LedgerError;
use super::service::LedgerService;
use super::types::{LedgerSummaryOptions, ResolvedOptions};
use super::validation::normalize_entry;

/// Strategy to generate amounts with 0 to 4 decimal places (0 to 10,000),
/// with exact zeros and sub-tolerance dust mixed in.
fn amount() -> impl Strategy<Value = Decimal> {
    prop_oneof![
        8 => (0i64..100_000_000i64).prop_map(|v| Decimal::new(v, 4)),
        1 => Just(Decimal::ZERO),
        1 => (1i64..1_000i64).prop_map(|v| Decimal::new(v, 13)),
    ]
}

/// Strategy to generate sides.
fn side() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("debit"), Just("credit")]
}

/// Strategy to generate currency codes in assorted spellings.
fn currency_code() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("USD"), Just("usd"), Just("EUR"), Just(" eur "), Just("GBP"), Just("JPY")]
}

/// Strategy to generate a batch of entries.
fn entries() -> impl Strategy<Value = Vec<LedgerEntry>> {
    prop::collection::vec((amount(), currency_code(), side()), 0..20).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (amount, currency, side))| {
                LedgerEntry::new(format!("e{i}"), "1000", amount, currency, side)
            })
            .collect()
    })
}

/// Strategy to generate positive exchange rates (0.0001 to 100.0000).
fn positive_rate() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

/// Strategy to generate options covering every currency in [`currency_code`].
fn options() -> impl Strategy<Value = LedgerSummaryOptions> {
    (positive_rate(), positive_rate(), positive_rate(), 0u32..=4).prop_map(
        |(eur, gbp, jpy, precision)| {
            LedgerSummaryOptions::new("USD")
                .with_rate("EUR", eur)
                .with_rate("gbp", gbp)
                .with_rate("JPY", jpy)
                .with_precision(precision)
        },
    )
}

fn fold(
    entries: &[LedgerEntry],
    resolved: &ResolvedOptions,
) -> Result<Accumulator, LedgerError> {
    entries.iter().try_fold(Accumulator::new(), |acc, entry| {
        let normalized = normalize_entry(entry, Some(resolved.zero_tolerance))?;
        acc.absorb(normalized, &resolved.rates)
    })
}

fn is_zero(entry: &NormalizedLedgerEntry, tolerance: Decimal) -> bool {
    entry.amount.value() <= tolerance
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // =========================================================================
    // Property 1: Idempotence
    // =========================================================================

    /// Property 1.1: Summarizing the same batch twice gives identical output.
    #[test]
    fn prop_summarize_is_idempotent(entries in entries(), options in options()) {
        let first = LedgerService::summarize(&entries, &options).unwrap();
        let second = LedgerService::summarize(&entries, &options).unwrap();

        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        prop_assert_eq!(first, second);
    }

    // =========================================================================
    // Property 2: Balance Identity
    // =========================================================================

    /// Property 2.1: `net == debit - credit` for every bucket, and the
    /// imbalance equals the base net.
    #[test]
    fn prop_balance_identity(entries in entries(), options in options()) {
        let summary = LedgerService::summarize(&entries, &options).unwrap();

        prop_assert_eq!(summary.imbalance, summary.base_totals.net);
        prop_assert_eq!(
            summary.base_totals.net,
            summary.base_totals.debit - summary.base_totals.credit
        );
        for totals in summary.totals_by_currency.values() {
            prop_assert_eq!(totals.net, totals.debit - totals.credit);
        }
    }

    /// Property 2.2: Every total is rounded to the requested precision.
    #[test]
    fn prop_totals_have_output_scale(entries in entries(), options in options()) {
        let precision = options.precision.unwrap();
        let summary = LedgerService::summarize(&entries, &options).unwrap();

        prop_assert_eq!(summary.base_totals.debit.scale(), precision);
        prop_assert_eq!(summary.base_totals.credit.scale(), precision);
        for totals in summary.totals_by_currency.values() {
            prop_assert_eq!(totals.debit.scale(), precision);
            prop_assert_eq!(totals.credit.scale(), precision);
        }
    }

    /// Property 2.3: At the input scale, each native net is the sum of the
    /// signed amounts of that currency's non-zero entries.
    #[test]
    fn prop_native_net_is_signed_sum(entries in entries(), options in options()) {
        let summary = LedgerService::summarize(&entries, &options.with_precision(4)).unwrap();

        for (currency, totals) in &summary.totals_by_currency {
            let expected: Decimal = entries
                .iter()
                .map(|e| normalize_entry(e, None).unwrap())
                .filter(|e| !e.is_zero && &e.currency == currency)
                .map(|e| e.signed_amount())
                .sum();
            prop_assert_eq!(totals.net, expected);
        }
    }

    // =========================================================================
    // Property 3: Zero-Tolerance Partition
    // =========================================================================

    /// Property 3.1: Entries within the zero tolerance are exactly the ones
    /// listed in `zero_entries`, in input order.
    #[test]
    fn prop_zero_partition(entries in entries(), options in options()) {
        let resolved = ResolvedOptions::resolve(&options).unwrap();
        let summary = LedgerService::summarize(&entries, &options).unwrap();

        let expected: Vec<String> = entries
            .iter()
            .map(|e| normalize_entry(e, None).unwrap())
            .filter(|e| is_zero(e, resolved.zero_tolerance))
            .map(|e| e.id.to_string())
            .collect();
        let actual: Vec<String> = summary.zero_entries.iter().map(|e| e.id.to_string()).collect();

        prop_assert_eq!(actual, expected);
        prop_assert!(summary.zero_entries.iter().all(|e| e.is_zero));
    }

    /// Property 3.2: Zero entries do not change any total.
    #[test]
    fn prop_zero_entries_do_not_affect_totals(entries in entries(), options in options()) {
        let resolved = ResolvedOptions::resolve(&options).unwrap();
        let non_zero: Vec<LedgerEntry> = entries
            .iter()
            .filter(|e| !is_zero(&normalize_entry(e, None).unwrap(), resolved.zero_tolerance))
            .cloned()
            .collect();

        let all = LedgerService::summarize(&entries, &options).unwrap();
        let filtered = LedgerService::summarize(&non_zero, &options).unwrap();

        prop_assert_eq!(all.base_totals, filtered.base_totals);
        prop_assert_eq!(all.totals_by_currency, filtered.totals_by_currency);
        prop_assert!(filtered.zero_entries.is_empty());
    }

    // =========================================================================
    // Property 4: Fold Associativity
    // =========================================================================

    /// Property 4.1: Folding two halves and merging equals folding the whole.
    #[test]
    fn prop_fold_merge_associative(
        entries in entries(),
        options in options(),
        split in 0usize..20,
    ) {
        let resolved = ResolvedOptions::resolve(&options).unwrap();
        let (left, right) = entries.split_at(split.min(entries.len()));

        let whole = fold(&entries, &resolved).unwrap();
        let merged = fold(left, &resolved)
            .unwrap()
            .merge(fold(right, &resolved).unwrap(), &resolved.base_currency)
            .unwrap();

        prop_assert_eq!(merged.finish(&resolved), whole.finish(&resolved));
    }

    /// Property 4.2: A rate supplied for the base currency never changes
    /// the result.
    #[test]
    fn prop_base_rate_override_ignored(
        entries in entries(),
        options in options(),
        bogus in positive_rate(),
    ) {
        let overridden = options.clone().with_rate("usd", bogus);
        prop_assert_eq!(
            LedgerService::summarize(&entries, &options).unwrap(),
            LedgerService::summarize(&entries, &overridden).unwrap()
        );
    }

    // =========================================================================
    // Property 5: Enforcement Consistency
    // =========================================================================

    /// Property 5.1: Enforcement fails exactly when the unenforced summary is
    /// not balanced, and reports the same imbalance.
    #[test]
    fn prop_enforce_iff_unbalanced(entries in entries(), options in options()) {
        let report = LedgerService::summarize(&entries, &options).unwrap();
        let enforced = LedgerService::summarize(&entries, &options.clone().enforce_balance(true));

        match enforced {
            Ok(summary) => {
                prop_assert!(report.balanced);
                prop_assert_eq!(summary, report);
            }
            Err(LedgerError::Unbalanced { imbalance, .. }) => {
                prop_assert!(!report.balanced);
                prop_assert_eq!(imbalance, report.imbalance);
            }
            Err(other) => prop_assert!(false, "unexpected error: {other}"),
        }
    }

    /// Property 5.2: A debit and credit of the same amount always balance.
    #[test]
    fn prop_mirrored_pair_balances(
        value in amount(),
        currency in currency_code(),
        options in options(),
    ) {
        let entries = vec![
            LedgerEntry::new("d", "1000", value, currency, "debit"),
            LedgerEntry::new("c", "2000", value, currency, "credit"),
        ];
        let summary = LedgerService::summarize(&entries, &options.enforce_balance(true)).unwrap();
        prop_assert!(summary.imbalance.is_zero());
    }
}
