//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::types::CurrencyCode;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Defaults applied to summarization requests.
    #[serde(default)]
    pub summary: SummaryConfig,
    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,
}

/// Summarization defaults.
///
/// Every field is a fallback: a request that sets the same option wins.
#[derive(Debug, Clone, Deserialize)]
pub struct SummaryConfig {
    /// Base currency used when a request names none.
    #[serde(default = "default_base_currency")]
    pub base_currency: String,
    /// Decimal places for rounded output.
    #[serde(default = "default_precision")]
    pub precision: u32,
    /// Magnitude at or below which an entry counts as zero.
    #[serde(default = "default_zero_tolerance")]
    pub zero_tolerance: Decimal,
    /// Magnitude at or below which an imbalance counts as balanced.
    #[serde(default)]
    pub balance_tolerance: Option<Decimal>,
    /// Whether an imbalance beyond tolerance fails the request.
    #[serde(default)]
    pub enforce_balance: bool,
}

fn default_base_currency() -> String {
    "USD".to_string()
}

fn default_precision() -> u32 {
    2
}

fn default_zero_tolerance() -> Decimal {
    Decimal::new(1, 9)
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            base_currency: default_base_currency(),
            precision: default_precision(),
            zero_tolerance: default_zero_tolerance(),
            balance_tolerance: None,
            enforce_balance: false,
        }
    }
}

impl SummaryConfig {
    /// Returns the configured base currency in canonical form.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Configuration` if the configured code is blank.
    pub fn base_currency(&self) -> AppResult<CurrencyCode> {
        CurrencyCode::parse(&self.base_currency)
            .map_err(|e| AppError::Configuration(format!("summary.base_currency: {e}")))
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit logs as JSON lines instead of human-readable text.
    #[serde(default)]
    pub json: bool,
}

fn default_log_filter() -> String {
    "tally=info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones overriding earlier ones:
    /// `config/default`, `config/{RUN_MODE}`, then `TALLY__*` variables
    /// (e.g. `TALLY__SUMMARY__BASE_CURRENCY=EUR`).
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> AppResult<Self> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TALLY").separator("__"))
            .build()?;

        let loaded: Self = config.try_deserialize()?;
        loaded.summary.base_currency()?;
        Ok(loaded)
    }
}
