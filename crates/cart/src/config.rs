//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `ARTCRAFTS_DATA_DIR` - Directory for stored values (default: `.artcrafts`)
//! - `ARTCRAFTS_CART_KEY` - Storage key for the cart (default: `cart`)
//! - `ARTCRAFTS_CURRENCY` - ISO 4217 code for display (default: `INR`)
//! - `ARTCRAFTS_SHIPPING_COST` - Flat shipping rate (default: 99)
//! - `ARTCRAFTS_FREE_SHIPPING_THRESHOLD` - Subtotal above which shipping is free (default: 1000)
//! - `ARTCRAFTS_CHECKOUT_DELAY_MS` - Simulated order processing time (default: 2000)
//! - `ARTCRAFTS_LOG_FORMAT` - `pretty` or `json` (default: `pretty`)

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use artcrafts_core::CurrencyCode;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::storage::{FileStore, SharedStorage};
use crate::store::DEFAULT_CART_KEY;
use crate::summary::ShippingPolicy;

const DEFAULT_DATA_DIR: &str = ".artcrafts";
const DEFAULT_CHECKOUT_DELAY_MS: u64 = 2000;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("expected `pretty` or `json`, got `{other}`")),
        }
    }
}

/// Cart application configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Directory holding the file-backed store
    pub data_dir: PathBuf,
    /// Storage key for the cart blob
    pub cart_key: String,
    /// Currency used when displaying prices
    pub currency: CurrencyCode,
    /// Shipping charge rules
    pub shipping: ShippingPolicy,
    /// Simulated order processing time
    pub checkout_delay: Duration,
    /// Log output format
    pub log_format: LogFormat,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            cart_key: DEFAULT_CART_KEY.to_string(),
            currency: CurrencyCode::default(),
            shipping: ShippingPolicy::default(),
            checkout_delay: Duration::from_millis(DEFAULT_CHECKOUT_DELAY_MS),
            log_format: LogFormat::default(),
        }
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration using `lookup` to resolve variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let data_dir = get("ARTCRAFTS_DATA_DIR").map_or(defaults.data_dir, PathBuf::from);
        let cart_key = get("ARTCRAFTS_CART_KEY").map_or(defaults.cart_key, |key| key.trim().to_string());
        let currency = parse_or("ARTCRAFTS_CURRENCY", get("ARTCRAFTS_CURRENCY"), defaults.currency)?;
        let flat_rate = parse_amount(
            "ARTCRAFTS_SHIPPING_COST",
            get("ARTCRAFTS_SHIPPING_COST"),
            defaults.shipping.flat_rate,
        )?;
        let free_threshold = parse_amount(
            "ARTCRAFTS_FREE_SHIPPING_THRESHOLD",
            get("ARTCRAFTS_FREE_SHIPPING_THRESHOLD"),
            defaults.shipping.free_threshold,
        )?;
        let delay_ms = parse_or(
            "ARTCRAFTS_CHECKOUT_DELAY_MS",
            get("ARTCRAFTS_CHECKOUT_DELAY_MS"),
            DEFAULT_CHECKOUT_DELAY_MS,
        )?;
        let log_format = parse_or("ARTCRAFTS_LOG_FORMAT", get("ARTCRAFTS_LOG_FORMAT"), defaults.log_format)?;

        Ok(Self {
            data_dir,
            cart_key,
            currency,
            shipping: ShippingPolicy {
                flat_rate,
                free_threshold,
            },
            checkout_delay: Duration::from_millis(delay_ms),
            log_format,
        })
    }

    /// Open the file-backed store under `data_dir`.
    #[must_use]
    pub fn open_storage(&self) -> SharedStorage {
        Arc::new(FileStore::new(&self.data_dir))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse `value` if present, otherwise fall back to `default`.
fn parse_or<T>(key: &str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.map_or(Ok(default), |raw| {
        raw.trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Parse a non-negative money amount.
fn parse_amount(key: &str, value: Option<String>, default: Decimal) -> Result<Decimal, ConfigError> {
    let amount = parse_or(key, value, default)?;
    if amount.is_sign_negative() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must not be negative".to_string(),
        ));
    }
    Ok(amount)
}
