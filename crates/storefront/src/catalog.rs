//! Read-only product catalog.
//!
//! The published catalog is a JSON array of products loaded once at
//! startup. All queries are linear scans; the catalog is small.

use std::collections::HashSet;
use std::path::Path;

use coaxx_core::{Product, ProductId};
use tracing::{debug, warn};

use crate::error::CatalogError;

/// An immutable list of products in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Wrap a product list.
    #[must_use]
    pub fn from_products(products: Vec<Product>) -> Self {
        let mut seen = HashSet::new();
        for product in &products {
            if !seen.insert(&product.id) {
                warn!(product_id = %product.id, "Duplicate product ID in catalog; first entry wins");
            }
        }
        Self { products }
    }

    /// Parse a catalog from JSON.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` if the JSON is not an array of products.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Ok(Self::from_products(products))
    }

    /// Load a catalog file.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Io` if the file cannot be read, or
    /// `CatalogError::Parse` if it is not a valid catalog.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_json(&json)?;
        debug!(path = %path.display(), products = catalog.len(), "Loaded catalog");
        Ok(catalog)
    }

    /// All products in display order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == *id)
    }

    /// Featured products for the home page.
    #[must_use]
    pub fn featured(&self) -> Vec<&Product> {
        CatalogQuery::default().featured().apply(self)
    }

    /// Discounted products, deepest discount first.
    #[must_use]
    pub fn deals(&self) -> Vec<&Product> {
        let mut deals = CatalogQuery::default().deals().apply(self);
        deals.sort_by_key(|product| std::cmp::Reverse(product.discount_percent()));
        deals
    }

    /// Products matching a free-text query.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Product> {
        CatalogQuery::default().search(query).apply(self)
    }

    /// Products carrying the tag with `slug`.
    #[must_use]
    pub fn with_tag(&self, slug: &str) -> Vec<&Product> {
        CatalogQuery::default().tag(slug).apply(self)
    }

    /// Products in the named collection.
    #[must_use]
    pub fn in_collection(&self, name: &str) -> Vec<&Product> {
        CatalogQuery::default().collection(name).apply(self)
    }
}

/// Combined catalog filter. Unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    pub search: Option<String>,
    pub tag: Option<String>,
    pub collection: Option<String>,
    pub category: Option<String>,
    /// `"all"` matches everything.
    pub experience_level: Option<String>,
    pub featured_only: bool,
    pub deals_only: bool,
    pub available_only: bool,
}

impl CatalogQuery {
    /// Require a free-text match.
    #[must_use]
    pub fn search(mut self, query: impl Into<String>) -> Self {
        self.search = Some(query.into());
        self
    }

    /// Require a tag slug.
    #[must_use]
    pub fn tag(mut self, slug: impl Into<String>) -> Self {
        self.tag = Some(slug.into());
        self
    }

    /// Require collection membership.
    #[must_use]
    pub fn collection(mut self, name: impl Into<String>) -> Self {
        self.collection = Some(name.into());
        self
    }

    /// Require a category (case-insensitive).
    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Require an experience level (case-insensitive).
    #[must_use]
    pub fn experience_level(mut self, level: impl Into<String>) -> Self {
        self.experience_level = Some(level.into());
        self
    }

    /// Only featured products.
    #[must_use]
    pub const fn featured(mut self) -> Self {
        self.featured_only = true;
        self
    }

    /// Only discounted products.
    #[must_use]
    pub const fn deals(mut self) -> Self {
        self.deals_only = true;
        self
    }

    /// Only products that can be added to a cart.
    #[must_use]
    pub const fn available(mut self) -> Self {
        self.available_only = true;
        self
    }

    /// Whether `product` satisfies every criterion.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        self.search
            .as_deref()
            .is_none_or(|query| product.matches_query(query))
            && self.tag.as_deref().is_none_or(|slug| product.has_tag(slug))
            && self
                .collection
                .as_deref()
                .is_none_or(|name| product.in_collection(name))
            && self.category.as_deref().is_none_or(|category| {
                product
                    .category
                    .as_deref()
                    .is_some_and(|c| c.eq_ignore_ascii_case(category))
            })
            && self
                .experience_level
                .as_deref()
                .is_none_or(|level| product.has_experience_level(level))
            && (!self.featured_only || product.featured)
            && (!self.deals_only || product.is_on_sale())
            && (!self.available_only || product.is_available())
    }

    /// Matching products in catalog order.
    #[must_use]
    pub fn apply<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Product> {
        catalog
            .products()
            .iter()
            .filter(|product| self.matches(product))
            .collect()
    }
}
