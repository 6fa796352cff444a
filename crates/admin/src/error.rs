//! Admin error types.

use coaxx_core::ProductId;
use coaxx_storage::StorageError;
use thiserror::Error;

/// Errors from editing or publishing the catalog draft.
#[derive(Debug, Error)]
pub enum AdminError {
    /// The draft slot rejected a read or write.
    #[error("Draft storage error: {0}")]
    Storage(#[from] StorageError),

    /// The product list could not be encoded.
    #[error("Failed to encode products: {0}")]
    Encode(#[from] serde_json::Error),

    /// Submitted product failed validation.
    #[error("Invalid product: {0}")]
    InvalidProduct(String),

    /// No product with this ID in the draft.
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    /// The published file could not be written.
    #[error("Failed to write {path}: {source}")]
    Publish {
        /// Target file path.
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            AdminError::InvalidProduct("name is required".to_string()).to_string(),
            "Invalid product: name is required"
        );
        assert_eq!(
            AdminError::NotFound(ProductId::new("robe")).to_string(),
            "Product not found: robe"
        );
    }

    #[test]
    fn test_storage_error_converts() {
        let err: AdminError = StorageError::QuotaExceeded {
            limit: 10,
            needed: 20,
        }
        .into();
        assert!(matches!(err, AdminError::Storage(_)));
    }
}
