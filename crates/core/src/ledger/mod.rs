//! Ledger summarization logic.
//!
//! This module implements the core ledger functionality:
//! - Raw and normalized ledger entries
//! - Entry validation and normalization
//! - Running totals as an explicit fold
//! - Summary options and results
//! - Error types for ledger operations
//! - Ledger service for batch summarization

pub mod balance;
pub mod entry;
pub mod error;
pub mod service;
pub mod types;
pub mod validation;

#[cfg(test)]
mod service_props;

pub use balance::{Accumulator, RunningTotals};
pub use entry::{Amount, LedgerEntry, NormalizedLedgerEntry, RawAmount, Side};
pub use error::{ErrorKind, LedgerError};
pub use service::LedgerService;
pub use types::{LedgerSummary, LedgerSummaryOptions, ResolvedOptions, SideTotals};
pub use validation::normalize_entry;
