//! # Register Configuration
//!
//! Settings loaded once at startup.
//!
//! ## Environment Variables
//! ```text
//! HARVEST_STORE_NAME        shown on receipts           default "Harvest Cafe"
//! HARVEST_TAX_RATE          percent, e.g. "7" or "8.25" default 7
//! HARVEST_CURRENCY          ISO 4217 code               default USD
//! HARVEST_LOCALE            display locale              default en-US
//! HARVEST_CALL_TIMEOUT_MS   bound per backend call      default 10000
//! ```
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

use harvest_core::{CurrencyFormat, TaxRate};

const DEFAULT_STORE_NAME: &str = "Harvest Cafe";
const DEFAULT_CURRENCY: &str = "USD";
const DEFAULT_LOCALE: &str = "en-US";
const DEFAULT_CALL_TIMEOUT_MS: u64 = 10_000;

/// Configuration error types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {var}: '{value}' ({reason})")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterConfig {
    /// Store name (displayed on receipts)
    pub store_name: String,

    /// Sales tax applied to every ticket
    pub tax_rate: TaxRate,

    /// Currency code (ISO 4217), fixed per installation
    pub currency: String,

    /// Locale used for separators
    pub locale: String,

    /// Upper bound for each backend call during checkout
    #[serde(skip)]
    pub call_timeout: Duration,
}

impl Default for RegisterConfig {
    /// Returns the cafe defaults: 7% tax, USD, en-US, 10 s per call.
    fn default() -> Self {
        RegisterConfig {
            store_name: DEFAULT_STORE_NAME.to_string(),
            tax_rate: TaxRate::default(),
            currency: DEFAULT_CURRENCY.to_string(),
            locale: DEFAULT_LOCALE.to_string(),
            call_timeout: Duration::from_millis(DEFAULT_CALL_TIMEOUT_MS),
        }
    }
}

impl RegisterConfig {
    /// Loads configuration from `HARVEST_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Loads configuration through `lookup`; unset or blank values keep
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = RegisterConfig::default();

        if let Some(name) = get("HARVEST_STORE_NAME") {
            config.store_name = name;
        }

        if let Some(raw) = get("HARVEST_TAX_RATE") {
            config.tax_rate = parse_tax_rate(&raw)?;
        }

        if let Some(raw) = get("HARVEST_CURRENCY") {
            if raw.len() != 3 || !raw.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(ConfigError::InvalidValue {
                    var: "HARVEST_CURRENCY",
                    value: raw,
                    reason: "expected a 3-letter ISO 4217 code",
                });
            }
            config.currency = raw.to_uppercase();
        }

        if let Some(locale) = get("HARVEST_LOCALE") {
            config.locale = locale;
        }

        if let Some(raw) = get("HARVEST_CALL_TIMEOUT_MS") {
            let ms = raw
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .ok_or(ConfigError::InvalidValue {
                    var: "HARVEST_CALL_TIMEOUT_MS",
                    value: raw.clone(),
                    reason: "expected a positive number of milliseconds",
                })?;
            config.call_timeout = Duration::from_millis(ms);
        }

        Ok(config)
    }

    /// Display rules for the configured currency and locale.
    pub fn currency_format(&self) -> CurrencyFormat {
        CurrencyFormat::for_locale(&self.locale, &self.currency)
    }
}

fn parse_tax_rate(raw: &str) -> Result<TaxRate, ConfigError> {
    let invalid = || ConfigError::InvalidValue {
        var: "HARVEST_TAX_RATE",
        value: raw.to_string(),
        reason: "expected a percentage between 0 and 100 with at most 4 decimal places",
    };
    let pct = raw
        .trim_end_matches('%')
        .parse::<f64>()
        .map_err(|_| invalid())?;
    TaxRate::from_percentage(pct).map_err(|_| invalid())
}
