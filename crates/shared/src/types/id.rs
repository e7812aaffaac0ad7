//! Opaque identifiers supplied by callers.
//!
//! Upstream systems key their records with whatever they like (UUIDs,
//! database sequences, import row numbers), so ids are kept as text and
//! only used for reporting.

use serde::{Deserialize, Serialize};

/// Wire shape accepted for an id: a string or a bare JSON number.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum IdRepr {
    /// Textual id.
    Text(String),
    /// Numeric id, kept in its JSON spelling.
    Number(serde_json::Number),
}

/// Macro to generate opaque text id wrappers.
macro_rules! opaque_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(
            Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(from = "IdRepr", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates an id from any string-like value.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Returns the id as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns true if the caller supplied no id.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl From<IdRepr> for $name {
            fn from(repr: IdRepr) -> Self {
                match repr {
                    IdRepr::Text(text) => Self(text),
                    IdRepr::Number(number) => Self(number.to_string()),
                }
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

opaque_id!(EntryId, "Caller-assigned identifier of a ledger entry.");
