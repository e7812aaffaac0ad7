//! Rounding and multi-currency conversion.

pub mod rates;
pub mod service;

#[cfg(test)]
mod props;

pub use rates::RateTable;
pub use service::CurrencyService;
