//! Storefront error types.

use coaxx_core::{EmailError, ProductId};
use coaxx_storage::StorageError;
use thiserror::Error;

/// Rejected cart mutations. A rejected call leaves the cart untouched and
/// does not notify subscribers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartError {
    /// Quantity must be at least one.
    #[error("quantity must be at least 1 (got {0})")]
    InvalidQuantity(u32),

    /// Product is flagged unavailable.
    #[error("product {product_id} is out of stock")]
    OutOfStock {
        /// Rejected product.
        product_id: ProductId,
    },

    /// The cart would hold more units than the catalog has.
    #[error("only {available} of product {product_id} available (requested {requested})")]
    InsufficientStock {
        /// Rejected product.
        product_id: ProductId,
        /// Units the cart would hold after the add.
        requested: u32,
        /// Units in stock.
        available: u32,
    },
}

/// Why a cart could not be written to its slot.
#[derive(Debug, Error)]
pub enum SaveError {
    /// The slot rejected the write.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The cart could not be encoded.
    #[error("failed to encode cart: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Catalog loading errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Catalog file could not be read.
    #[error("failed to read catalog {path}: {source}")]
    Io {
        /// Catalog file path.
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Catalog JSON is not an array of products.
    #[error("invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Checkout stub errors.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Nothing to check out.
    #[error("cart is empty")]
    EmptyCart,

    /// Customer email failed validation.
    #[error("invalid email address: {0}")]
    InvalidEmail(#[from] EmailError),

    /// A required customer field is blank.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}
