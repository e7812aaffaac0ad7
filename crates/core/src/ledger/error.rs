//! Ledger error types.
//!
//! Every failure falls into one of two kinds. Type errors mean the input has
//! the wrong shape (not a record, unknown side, non-numeric amount, blank
//! currency). Range errors mean a well-formed value is outside its legal
//! domain (negative amount, missing or non-positive rate, overflow, enforced
//! imbalance). Any error aborts the whole summarization.

use rust_decimal::Decimal;
use tally_shared::AppError;
use tally_shared::types::{CurrencyCode, EntryId};
use thiserror::Error;

/// Broad classification of a [`LedgerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed structural input.
    Type,
    /// Structurally valid value outside its legal domain.
    Range,
}

/// Errors that can occur while summarizing a ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Shape Errors ==========
    /// The entry collection is not an array.
    #[error("Ledger entries must be an array")]
    EntriesNotSequence,

    /// No options were supplied.
    #[error("Summary options are required")]
    MissingOptions,

    /// The options could not be deserialized.
    #[error("Summary options are malformed: {0}")]
    MalformedOptions(String),

    /// An element of the entry collection is not a record.
    #[error("Entry at index {index} is not an object")]
    EntryNotRecord {
        /// Position in the input collection.
        index: usize,
    },

    /// A record could not be read as a ledger entry.
    #[error("Entry {entry} is malformed: {reason}")]
    MalformedEntry {
        /// The entry id if the record carries one, else its position.
        entry: String,
        /// Deserializer message.
        reason: String,
    },

    // ========== Entry Validation Errors ==========
    /// Side is not exactly `debit` or `credit`.
    #[error("Entry {id} has invalid side {side:?}; expected \"debit\" or \"credit\"")]
    InvalidSide {
        /// Offending entry.
        id: EntryId,
        /// The side as supplied.
        side: String,
    },

    /// Amount is `NaN`, infinite, or not a number.
    #[error("Entry {id} amount must be a finite number")]
    NonFiniteAmount {
        /// Offending entry.
        id: EntryId,
    },

    /// Amount is below zero.
    #[error("Entry {id} amount cannot be negative: {amount}")]
    NegativeAmount {
        /// Offending entry.
        id: EntryId,
        /// The coerced amount.
        amount: Decimal,
    },

    /// Amount is finite but too large to represent.
    #[error("Entry {id} amount is outside the representable range")]
    AmountOutOfRange {
        /// Offending entry.
        id: EntryId,
    },

    /// Currency code is blank.
    #[error("Currency code must be a non-empty string")]
    EmptyCurrency,

    // ========== Numeric Errors ==========
    /// A value handed to rounding or conversion is `NaN` or infinite.
    #[error("Value must be a finite number")]
    NonFiniteValue,

    /// A value handed to rounding or conversion is too large to represent.
    #[error("Value is outside the representable range")]
    ValueOutOfRange,

    /// Accumulated totals exceeded the representable range.
    #[error("Totals overflowed while accumulating {currency}")]
    Overflow {
        /// Currency being accumulated.
        currency: CurrencyCode,
    },

    // ========== Currency Errors ==========
    /// No rate was supplied for a non-base currency.
    #[error("No exchange rate found for {currency} to {base}")]
    NoExchangeRate {
        /// Source currency.
        currency: CurrencyCode,
        /// Base currency.
        base: CurrencyCode,
    },

    /// A supplied rate is not a finite positive number.
    #[error("Exchange rate for {currency} must be a finite positive number")]
    InvalidExchangeRate {
        /// Source currency.
        currency: CurrencyCode,
    },

    // ========== Balance Errors ==========
    /// Debits and credits differ by more than the balance tolerance.
    #[error("Ledger is not balanced: imbalance of {imbalance} {base_currency} exceeds tolerance {tolerance}")]
    Unbalanced {
        /// Debit minus credit in base currency.
        imbalance: Decimal,
        /// Base currency.
        base_currency: CurrencyCode,
        /// Tolerance in effect.
        tolerance: Decimal,
    },
}

impl LedgerError {
    /// Returns whether this is a type or a range error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EntriesNotSequence
            | Self::MissingOptions
            | Self::MalformedOptions(_)
            | Self::EntryNotRecord { .. }
            | Self::MalformedEntry { .. }
            | Self::InvalidSide { .. }
            | Self::NonFiniteAmount { .. }
            | Self::EmptyCurrency
            | Self::NonFiniteValue => ErrorKind::Type,

            Self::NegativeAmount { .. }
            | Self::AmountOutOfRange { .. }
            | Self::ValueOutOfRange
            | Self::Overflow { .. }
            | Self::NoExchangeRate { .. }
            | Self::InvalidExchangeRate { .. }
            | Self::Unbalanced { .. } => ErrorKind::Range,
        }
    }

    /// Returns true for type (shape) errors.
    #[must_use]
    pub fn is_type_error(&self) -> bool {
        self.kind() == ErrorKind::Type
    }

    /// Returns true for range (domain) errors.
    #[must_use]
    pub fn is_range_error(&self) -> bool {
        self.kind() == ErrorKind::Range
    }

    /// Names an entry that carries no id by its position in the batch.
    ///
    /// Errors that already name an id, or name no entry, are returned as is.
    #[must_use]
    pub fn at_position(self, index: usize) -> Self {
        let label = || EntryId::new(format!("at index {index}"));
        match self {
            Self::InvalidSide { id, side } if id.is_empty() => Self::InvalidSide {
                id: label(),
                side,
            },
            Self::NonFiniteAmount { id } if id.is_empty() => Self::NonFiniteAmount { id: label() },
            Self::NegativeAmount { id, amount } if id.is_empty() => Self::NegativeAmount {
                id: label(),
                amount,
            },
            Self::AmountOutOfRange { id } if id.is_empty() => {
                Self::AmountOutOfRange { id: label() }
            }
            other => other,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EntriesNotSequence => "ENTRIES_NOT_SEQUENCE",
            Self::MissingOptions => "MISSING_OPTIONS",
            Self::MalformedOptions(_) => "MALFORMED_OPTIONS",
            Self::EntryNotRecord { .. } => "ENTRY_NOT_RECORD",
            Self::MalformedEntry { .. } => "MALFORMED_ENTRY",
            Self::InvalidSide { .. } => "INVALID_SIDE",
            Self::NonFiniteAmount { .. } => "NON_FINITE_AMOUNT",
            Self::NegativeAmount { .. } => "NEGATIVE_AMOUNT",
            Self::AmountOutOfRange { .. } => "AMOUNT_OUT_OF_RANGE",
            Self::EmptyCurrency => "EMPTY_CURRENCY",
            Self::NonFiniteValue => "NON_FINITE_VALUE",
            Self::ValueOutOfRange => "VALUE_OUT_OF_RANGE",
            Self::Overflow { .. } => "TOTALS_OVERFLOW",
            Self::NoExchangeRate { .. } => "NO_EXCHANGE_RATE",
            Self::InvalidExchangeRate { .. } => "INVALID_EXCHANGE_RATE",
            Self::Unbalanced { .. } => "UNBALANCED_LEDGER",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self.kind() {
            // 400 Bad Request - malformed input
            ErrorKind::Type => 400,
            // 422 Unprocessable Entity - valid shape, illegal value
            ErrorKind::Range => 422,
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err.kind() {
            ErrorKind::Type => Self::Validation(err.to_string()),
            ErrorKind::Range => Self::BusinessRule(err.to_string()),
        }
    }
}
