//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `COAXX_DATA_DIR` - Directory holding the durable slots (default: .coaxx)
//! - `COAXX_CART_KEY` - Slot key for the cart (default: coaxx-cart)
//! - `COAXX_CATALOG_PATH` - Published catalog file (default: products.json)
//! - `COAXX_FREE_SHIPPING_THRESHOLD` - Subtotals above this ship free (default: 100)
//! - `COAXX_SHIPPING_FLAT_RATE` - Shipping below the threshold (default: 10)
//! - `COAXX_TAX_RATE` - Sales tax fraction (default: 0.08)

use std::path::PathBuf;
use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::cart::DEFAULT_CART_KEY;
use crate::summary::PricingRules;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// Directory for the file-backed key-value store
    pub data_dir: PathBuf,
    /// Slot key the cart is saved under
    pub cart_key: String,
    /// Published catalog JSON file
    pub catalog_path: PathBuf,
    /// Shipping and tax rules
    pub pricing: PricingRules,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".coaxx"),
            cart_key: DEFAULT_CART_KEY.to_string(),
            catalog_path: PathBuf::from("products.json"),
            pricing: PricingRules::default(),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let env = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let cart_key = env("COAXX_CART_KEY").unwrap_or(defaults.cart_key);
        coaxx_storage::validate_key(&cart_key)
            .map_err(|e| ConfigError::InvalidEnvVar("COAXX_CART_KEY".to_string(), e.to_string()))?;

        let pricing = PricingRules {
            free_shipping_threshold: parse_amount(
                "COAXX_FREE_SHIPPING_THRESHOLD",
                env("COAXX_FREE_SHIPPING_THRESHOLD"),
                defaults.pricing.free_shipping_threshold,
            )?,
            flat_shipping: parse_amount(
                "COAXX_SHIPPING_FLAT_RATE",
                env("COAXX_SHIPPING_FLAT_RATE"),
                defaults.pricing.flat_shipping,
            )?,
            tax_rate: parse_amount(
                "COAXX_TAX_RATE",
                env("COAXX_TAX_RATE"),
                defaults.pricing.tax_rate,
            )?,
        };

        Ok(Self {
            data_dir: env("COAXX_DATA_DIR").map_or(defaults.data_dir, PathBuf::from),
            cart_key,
            catalog_path: env("COAXX_CATALOG_PATH").map_or(defaults.catalog_path, PathBuf::from),
            pricing,
        })
    }
}

/// Parse a non-negative decimal, falling back to `default` when unset.
fn parse_amount(key: &str, value: Option<String>, default: Decimal) -> Result<Decimal, ConfigError> {
    let Some(value) = value else {
        return Ok(default);
    };
    let amount = Decimal::from_str(value.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if amount.is_sign_negative() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must not be negative".to_string(),
        ));
    }
    Ok(amount)
}
