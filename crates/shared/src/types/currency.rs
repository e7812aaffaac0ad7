//! Canonical currency codes.
//!
//! Callers hand over ISO-4217-like codes in any casing and with stray
//! whitespace. A `CurrencyCode` can only be built through
//! [`CurrencyCode::parse`], so every code inside the system is trimmed and
//! upper-cased and two spellings of the same currency compare equal.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A trimmed, upper-cased, non-empty currency code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

/// The supplied currency code was empty after trimming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Currency code must be a non-empty string")]
pub struct EmptyCurrencyCode;

impl CurrencyCode {
    /// Canonicalizes a raw code: trims surrounding whitespace and upper-cases.
    ///
    /// # Errors
    ///
    /// Returns `EmptyCurrencyCode` if nothing is left after trimming.
    pub fn parse(raw: &str) -> Result<Self, EmptyCurrencyCode> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(EmptyCurrencyCode);
        }
        Ok(Self(trimmed.to_uppercase()))
    }

    /// Returns true if `raw` is already in canonical form.
    #[must_use]
    pub fn is_canonical(raw: &str) -> bool {
        Self::parse(raw).is_ok_and(|code| code.0 == raw)
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = EmptyCurrencyCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl AsRef<str> for CurrencyCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = EmptyCurrencyCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
