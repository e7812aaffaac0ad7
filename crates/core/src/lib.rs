//! Core business logic for Tally.
//!
//! This crate contains pure business logic with ZERO I/O dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Entry normalization and batch summarization
//! - `currency` - Rounding and conversion into a base currency

pub mod currency;
pub mod ledger;
