//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `COAXX_ADMIN_DATA_DIR` - Directory holding the draft slot (default: `COAXX_DATA_DIR`, then .coaxx)
//! - `COAXX_DRAFT_KEY` - Slot key for the catalog draft (default: coaxx-products-draft)
//! - `COAXX_CATALOG_PATH` - Published catalog file (default: products.json)

use std::path::PathBuf;

use thiserror::Error;

use crate::draft::DEFAULT_DRAFT_KEY;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Admin configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminConfig {
    /// Directory for the file-backed key-value store
    pub data_dir: PathBuf,
    /// Slot key the draft is saved under
    pub draft_key: String,
    /// Published catalog JSON file
    pub catalog_path: PathBuf,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".coaxx"),
            draft_key: DEFAULT_DRAFT_KEY.to_string(),
            catalog_path: PathBuf::from("products.json"),
        }
    }
}

impl AdminConfig {
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

        let draft_key = env("COAXX_DRAFT_KEY").unwrap_or(defaults.draft_key);
        coaxx_storage::validate_key(&draft_key)
            .map_err(|e| ConfigError::InvalidEnvVar("COAXX_DRAFT_KEY".to_string(), e.to_string()))?;

        let data_dir = env("COAXX_ADMIN_DATA_DIR")
            .or_else(|| env("COAXX_DATA_DIR"))
            .map_or(defaults.data_dir, PathBuf::from);

        Ok(Self {
            data_dir,
            draft_key,
            catalog_path: env("COAXX_CATALOG_PATH").map_or(defaults.catalog_path, PathBuf::from),
        })
    }
}
