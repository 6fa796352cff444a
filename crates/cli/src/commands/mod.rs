//! Subcommand implementations.

pub mod admin;
pub mod cart;
pub mod catalog;
pub mod checkout;
mod render;

use coaxx_storage::{FileStore, StorageError};
use coaxx_storefront::{CartStore, Catalog, CatalogError, StorefrontConfig, Variant};
use thiserror::Error;

/// Errors raised by the CLI itself rather than the libraries.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Product ID not in the catalog.
    #[error("Unknown product: {0}")]
    UnknownProduct(String),

    /// A required option was not given.
    #[error("Missing required option --{0}")]
    MissingOption(&'static str),
}

/// Parse a `key=value` variant attribute.
pub fn parse_attribute(text: &str) -> Result<(String, String), String> {
    let (key, value) = text
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got {text:?}"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing attribute name in {text:?}"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

/// Build a variant from parsed attributes; no attributes means no variant.
fn variant_from(attributes: Vec<(String, String)>) -> Option<Variant> {
    let variant: Variant = attributes.into_iter().collect();
    Variant::normalize(Some(variant))
}

/// Open the session cart from the configured data directory.
fn open_cart(config: &StorefrontConfig) -> Result<CartStore<FileStore>, StorageError> {
    let storage = FileStore::open(&config.data_dir)?;
    let mut cart = CartStore::open(storage, config.cart_key.as_str());
    if let Some(notice) = cart.take_load_notice() {
        render::notice(notice);
    }
    Ok(cart)
}

fn load_catalog(config: &StorefrontConfig) -> Result<Catalog, CatalogError> {
    Catalog::load(&config.catalog_path)
}
