//! Integration tests for Coaxx.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p coaxx-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_persistence` - Cart round trips through the file-backed store
//! - `checkout_flow` - Catalog to cart to pending order
//! - `admin_publish` - Draft edits published and read back by the storefront
//!
//! Every test gets its own temporary data directory; nothing touches the
//! working directory.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::{Path, PathBuf};

use coaxx_storage::{FileStore, StorageError};
use tempfile::TempDir;

/// A small published catalog in the legacy camelCase format.
pub const SAMPLE_CATALOG: &str = r#"[
    {
        "id": "silk-robe",
        "name": "Silk Robe",
        "category": "loungewear",
        "price": 80.00,
        "isFeatured": true,
        "inStock": true,
        "collections": ["Bridal"],
        "tags": ["sleepwear"],
        "images": ["/img/robe.jpg"],
        "sizesAvailable": ["S", "M", "L"],
        "experienceLevel": "Beginner",
        "materials": ["mulberry silk"],
        "careNotes": "Hand wash cold",
        "paymentLink": "https://pay.example.com/silk-robe"
    },
    {
        "id": "velvet-mask",
        "name": "Velvet Mask",
        "category": "accessories",
        "price": 15.00,
        "originalPrice": 20.00,
        "stockQuantity": 2,
        "tags": ["accessories"]
    },
    {
        "id": "lace-set",
        "name": "Lace Set",
        "category": "lingerie",
        "price": 45.50,
        "inStock": false
    }
]"#;

/// Temporary data directory plus a published catalog file.
pub struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    /// Create an empty environment with [`SAMPLE_CATALOG`] published.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the temporary directory cannot be created.
    pub fn new() -> std::io::Result<Self> {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join("products.json"), SAMPLE_CATALOG)?;
        Ok(Self { dir })
    }

    /// Root of the temporary directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Directory holding the key-value slots.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    /// Published catalog path.
    #[must_use]
    pub fn catalog_path(&self) -> PathBuf {
        self.dir.path().join("products.json")
    }

    /// Open a fresh handle on the slot directory, as a new process would.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the directory cannot be created.
    pub fn store(&self) -> Result<FileStore, StorageError> {
        FileStore::open(self.data_dir())
    }
}
