//! Ledger entry domain types.
//!
//! A [`LedgerEntry`] is what callers hand over: loosely typed, with the amount
//! still in whatever numeric form the upstream store produced and the side
//! still as text. Normalization turns it into a [`NormalizedLedgerEntry`],
//! whose types guarantee the invariants the summary relies on.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tally_shared::types::id::IdRepr;
use tally_shared::types::{CurrencyCode, EntryId};
use thiserror::Error;

/// Side of a ledger entry.
///
/// The direction of a movement lives here and only here; amounts are always
/// non-negative magnitudes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Debit entry.
    Debit,
    /// Credit entry.
    Credit,
}

/// The text was not exactly `debit` or `credit`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid side {0:?}")]
pub struct ParseSideError(pub String);

impl FromStr for Side {
    type Err = ParseSideError;

    /// Parses a side. Matching is exact: `"Debit"` or `" debit"` are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debit" => Ok(Self::Debit),
            "credit" => Ok(Self::Credit),
            other => Err(ParseSideError(other.to_string())),
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Debit => f.write_str("debit"),
            Self::Credit => f.write_str("credit"),
        }
    }
}

/// Why a raw numeric value could not be turned into a decimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoercionError {
    /// `NaN`, an infinity, or text that is not a number.
    NotANumber,
    /// A finite number too large for `Decimal`.
    OutOfRange,
}

/// A numeric value as supplied by a caller.
///
/// JSON numbers, numeric strings and exact decimals are all accepted and
/// coerced the same way, so upstream stores that serialize money as text
/// work unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    /// Binary floating point, typically a JSON number.
    Number(f64),
    /// Numeric text in plain or scientific notation.
    Text(String),
    /// Already an exact decimal.
    Exact(Decimal),
}

impl RawAmount {
    /// The value used when a caller omits the amount; it coerces to
    /// `NotANumber`.
    #[must_use]
    pub fn missing() -> Self {
        Self::Text(String::new())
    }

    /// Coerces to an exact decimal.
    ///
    /// Negative zero comes back as plain zero.
    ///
    /// # Errors
    ///
    /// Returns `CoercionError::NotANumber` for non-finite or unparsable input
    /// and `CoercionError::OutOfRange` for finite input `Decimal` cannot hold.
    pub fn coerce(&self) -> Result<Decimal, CoercionError> {
        let value = match self {
            Self::Number(n) => coerce_float(*n)?,
            Self::Text(text) => parse_text(text.trim())?,
            Self::Exact(d) => *d,
        };
        Ok(if value.is_zero() { Decimal::ZERO } else { value })
    }
}

fn coerce_float(n: f64) -> Result<Decimal, CoercionError> {
    if !n.is_finite() {
        return Err(CoercionError::NotANumber);
    }
    // Shortest round-trip spelling first, so 1.005_f64 is 1.005. Digits past
    // scale 28 are rounded away, so tiny magnitudes become zero.
    Decimal::from_str(&n.to_string())
        .ok()
        .or_else(|| Decimal::from_f64(n))
        .ok_or(CoercionError::OutOfRange)
}

fn parse_text(text: &str) -> Result<Decimal, CoercionError> {
    if text.is_empty() {
        return Err(CoercionError::NotANumber);
    }
    if let Ok(value) = Decimal::from_str(text).or_else(|_| Decimal::from_scientific(text)) {
        return Ok(value);
    }
    // Exponents beyond what `Decimal` spells directly: "1e-40" is a tiny
    // number, "1e40" a huge one.
    match text.parse::<f64>() {
        Ok(n) => coerce_float(n),
        Err(_) => Err(CoercionError::NotANumber),
    }
}

impl From<Decimal> for RawAmount {
    fn from(value: Decimal) -> Self {
        Self::Exact(value)
    }
}

impl From<f64> for RawAmount {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for RawAmount {
    fn from(value: i64) -> Self {
        Self::Exact(Decimal::from(value))
    }
}

impl From<&str> for RawAmount {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// A non-negative decimal magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

/// Attempted to build an [`Amount`] from a negative value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("amount must not be negative: {0}")]
pub struct NegativeAmountError(pub Decimal);

impl Amount {
    /// Zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Wraps a value, rejecting negatives.
    ///
    /// # Errors
    ///
    /// Returns `NegativeAmountError` if `value < 0`.
    pub fn new(value: Decimal) -> Result<Self, NegativeAmountError> {
        if value < Decimal::ZERO {
            return Err(NegativeAmountError(value));
        }
        Ok(Self(if value.is_zero() { Decimal::ZERO } else { value }))
    }

    /// Returns the wrapped decimal.
    #[must_use]
    pub const fn value(self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = NegativeAmountError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A raw ledger entry as supplied by the caller.
///
/// Missing or wrongly typed `id`, `currency`, `side` and `amount` fields are
/// tolerated at deserialization time so that validation reports them in its
/// usual order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    /// Caller-assigned id, used in error messages only. Empty when absent.
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: EntryId,
    /// Ledger account, passed through unchanged.
    #[serde(default)]
    pub account: String,
    /// Magnitude of the movement.
    #[serde(default = "RawAmount::missing", deserialize_with = "lenient_amount")]
    pub amount: RawAmount,
    /// Currency code in any casing. Non-text values read as blank.
    #[serde(default, deserialize_with = "text_or_blank")]
    pub currency: String,
    /// `"debit"` or `"credit"`. Non-text values keep their JSON spelling.
    #[serde(default, deserialize_with = "text_or_json")]
    pub side: String,
    /// Posting timestamp, opaque.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posted_at: Option<serde_json::Value>,
    /// Free text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Arbitrary caller data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

fn lenient_id<'de, D>(deserializer: D) -> Result<EntryId, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<IdRepr>::deserialize(deserializer)?
        .map(EntryId::from)
        .unwrap_or_default())
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<RawAmount, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(RawAmount::deserialize(&value).unwrap_or_else(|_| RawAmount::missing()))
}

fn text_or_blank<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        _ => String::new(),
    })
}

fn text_or_json<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

impl LedgerEntry {
    /// Creates an entry with no optional fields set.
    #[must_use]
    pub fn new(
        id: impl Into<EntryId>,
        account: impl Into<String>,
        amount: impl Into<RawAmount>,
        currency: impl Into<String>,
        side: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            account: account.into(),
            amount: amount.into(),
            currency: currency.into(),
            side: side.into(),
            posted_at: None,
            description: None,
            metadata: None,
        }
    }
}

/// A validated ledger entry.
///
/// `currency` is canonical and `amount` is finite and non-negative by
/// construction. Pass-through fields are copied verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedLedgerEntry {
    /// Caller-assigned id.
    pub id: EntryId,
    /// Ledger account.
    pub account: String,
    /// Non-negative magnitude.
    pub amount: Amount,
    /// Canonical currency code.
    pub currency: CurrencyCode,
    /// Debit or credit.
    pub side: Side,
    /// Posting timestamp, opaque.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posted_at: Option<serde_json::Value>,
    /// Free text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Arbitrary caller data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    /// Whether the magnitude was within the zero tolerance used to
    /// normalize this entry.
    pub is_zero: bool,
}

impl NormalizedLedgerEntry {
    /// Returns the signed amount (positive for debit, negative for credit).
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        match self.side {
            Side::Debit => self.amount.value(),
            Side::Credit => -self.amount.value(),
        }
    }
}
