//! Common types used across the application.

pub mod currency;
pub mod id;

pub use currency::{CurrencyCode, EmptyCurrencyCode};
pub use id::EntryId;
