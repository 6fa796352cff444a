//! Catalog draft editing.
//!
//! The draft is the full product list serialized into one slot. Edits are
//! applied in memory and then saved; a failed save keeps the edit in memory
//! and returns the storage error so the caller can warn.

use std::path::Path;

use chrono::Utc;
use coaxx_core::{CurrencyCode, Product, ProductId, Tag, slugify};
use coaxx_storage::KeyValueStore;
use rust_decimal::Decimal;
use serde_json::Map;
use tracing::{debug, info, warn};

use crate::error::AdminError;

/// Slot key used when none is configured.
pub const DEFAULT_DRAFT_KEY: &str = "coaxx-products-draft";

/// Where the products currently being edited came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftSource {
    /// A saved draft (unpublished edits may exist).
    Draft,
    /// The published catalog; nothing edited yet.
    Published,
}

/// Product fields as submitted from the edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductInput {
    /// Existing product to replace; `None` creates a new product.
    pub id: Option<ProductId>,
    pub name: String,
    /// Derived from the name when blank.
    pub slug: Option<String>,
    pub category: Option<String>,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub price: Decimal,
    /// Ignored unless positive.
    pub sale_price: Option<Decimal>,
    /// Ignored unless positive.
    pub compare_at_price: Option<Decimal>,
    pub currency: CurrencyCode,
    pub images: Vec<String>,
    /// Legacy single image, kept alongside `images`.
    pub image_url: Option<String>,
    pub in_stock: Option<bool>,
    pub stock_quantity: Option<u32>,
    pub featured: bool,
    pub tags: Vec<String>,
    pub collections: Vec<String>,
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
    pub experience_level: Option<String>,
}

impl ProductInput {
    /// A new in-stock product with only a name and price.
    #[must_use]
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Self {
            name: name.into(),
            price,
            in_stock: Some(true),
            ..Self::default()
        }
    }

    /// Prefill the form from an existing product.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: Some(product.id.clone()),
            name: product.name.clone(),
            slug: product.slug.clone(),
            category: product.category.clone(),
            short_description: product.short_description.clone(),
            description: product.description.clone(),
            price: product.price,
            sale_price: product.sale_price,
            compare_at_price: product.compare_at_price,
            currency: product.currency,
            images: product.images.clone(),
            image_url: product.image_url.clone(),
            in_stock: product.in_stock,
            stock_quantity: product.stock_quantity,
            featured: product.featured,
            tags: product.tags.iter().map(|tag| tag.name.clone()).collect(),
            collections: product.collections.clone(),
            colors: product.colors.clone(),
            sizes: product.sizes.clone(),
            experience_level: product.experience_level.clone(),
        }
    }

    fn validate(&self) -> Result<(), AdminError> {
        if self.name.trim().is_empty() {
            return Err(AdminError::InvalidProduct("name is required".to_string()));
        }
        if self.price.is_sign_negative() {
            return Err(AdminError::InvalidProduct(
                "price must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Split a comma-separated form field into trimmed, non-empty entries.
#[must_use]
pub fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Admin list filter. Unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftFilter {
    /// Case-insensitive match on name or tag names.
    pub search: Option<String>,
    pub category: Option<String>,
    pub collection: Option<String>,
    pub experience_level: Option<String>,
}

impl DraftFilter {
    fn matches(&self, product: &Product) -> bool {
        let search = self
            .search
            .as_deref()
            .map(|q| q.trim().to_lowercase())
            .filter(|q| !q.is_empty());

        search.is_none_or(|needle| {
            product.name.to_lowercase().contains(&needle)
                || product
                    .tags
                    .iter()
                    .any(|tag| tag.name.to_lowercase().contains(&needle))
        }) && self.category.as_deref().is_none_or(|category| {
            product
                .category
                .as_deref()
                .is_some_and(|c| c.eq_ignore_ascii_case(category))
        }) && self
            .collection
            .as_deref()
            .is_none_or(|name| product.in_collection(name))
            && self
                .experience_level
                .as_deref()
                .is_none_or(|level| product.has_experience_level(level))
    }
}

/// The product list being edited, backed by a draft slot.
#[derive(Debug)]
pub struct CatalogDraft<S> {
    storage: S,
    key: String,
    products: Vec<Product>,
    source: DraftSource,
}

impl<S: KeyValueStore> CatalogDraft<S> {
    /// Resume the draft saved under `key`, or start from `published`.
    ///
    /// An unreadable or corrupt draft is logged and ignored.
    pub fn open(storage: S, key: impl Into<String>, published: Vec<Product>) -> Self {
        let key = key.into();

        let draft = match storage.get(&key) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Product>>(&raw) {
                Ok(products) => Some(products),
                Err(e) => {
                    warn!(%key, error = %e, "Discarded corrupt catalog draft; using published catalog");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(%key, error = %e, "Could not read catalog draft; using published catalog");
                None
            }
        };

        let (products, source) = match draft {
            Some(products) => {
                info!(%key, products = products.len(), "Loaded catalog draft");
                (products, DraftSource::Draft)
            }
            None => (published, DraftSource::Published),
        };

        Self {
            storage,
            key,
            products,
            source,
        }
    }

    /// Where the current products came from.
    #[must_use]
    pub const fn source(&self) -> DraftSource {
        self.source
    }

    /// Products in display order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == *id)
    }

    /// Products matching `filter`, in display order.
    #[must_use]
    pub fn filter(&self, filter: &DraftFilter) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|product| filter.matches(product))
            .collect()
    }

    /// Create or replace a product, then save the draft.
    ///
    /// New products get the ID `<slug>-<unix millis>`. A replaced product
    /// keeps its creation time and any catalog fields the form does not
    /// cover.
    ///
    /// # Errors
    ///
    /// - `AdminError::InvalidProduct` if the name is blank or the price negative
    /// - `AdminError::NotFound` if `input.id` names a product not in the draft
    /// - `AdminError::Storage` / `AdminError::Encode` if saving fails (the edit
    ///   is kept in memory)
    pub fn upsert(&mut self, input: ProductInput) -> Result<ProductId, AdminError> {
        input.validate()?;

        let now = Utc::now();
        let slug = input
            .slug
            .as_deref()
            .map(str::trim)
            .filter(|slug| !slug.is_empty())
            .map_or_else(|| slugify(&input.name), str::to_string);
        let slug = if slug.is_empty() {
            "product".to_string()
        } else {
            slug
        };

        let (id, index, created_at, extra) = match &input.id {
            Some(id) => {
                let (index, existing) = self
                    .products
                    .iter()
                    .enumerate()
                    .find(|(_, product)| product.id == *id)
                    .ok_or_else(|| AdminError::NotFound(id.clone()))?;
                (
                    id.clone(),
                    Some(index),
                    existing.created_at.or(Some(now)),
                    existing.extra.clone(),
                )
            }
            None => (
                self.new_product_id(&slug, now.timestamp_millis()),
                None,
                Some(now),
                Map::new(),
            ),
        };

        let product = Product {
            id: id.clone(),
            name: input.name.trim().to_string(),
            slug: Some(slug),
            category: non_blank(input.category),
            short_description: non_blank(input.short_description),
            description: non_blank(input.description),
            price: input.price,
            sale_price: input.sale_price.filter(|sale| *sale > Decimal::ZERO),
            compare_at_price: input.compare_at_price.filter(|was| *was > Decimal::ZERO),
            currency: input.currency,
            images: input.images,
            image_url: non_blank(input.image_url),
            in_stock: input.in_stock,
            stock_quantity: input.stock_quantity,
            featured: input.featured,
            tags: input.tags.iter().map(Tag::named).collect(),
            collections: input.collections,
            colors: input.colors,
            sizes: input.sizes,
            experience_level: non_blank(input.experience_level),
            created_at,
            updated_at: Some(now),
            extra,
        };

        match index.and_then(|i| self.products.get_mut(i)) {
            Some(existing) => {
                *existing = product;
                info!(product_id = %id, "Updated product in draft");
            }
            None => {
                self.products.push(product);
                info!(product_id = %id, "Added product to draft");
            }
        }

        self.save()?;
        Ok(id)
    }

    /// Remove a product, saving the draft if it was present.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Storage` / `AdminError::Encode` if saving fails.
    pub fn delete(&mut self, id: &ProductId) -> Result<bool, AdminError> {
        let before = self.products.len();
        self.products.retain(|product| product.id != *id);
        if self.products.len() == before {
            debug!(product_id = %id, "No product to delete");
            return Ok(false);
        }

        info!(product_id = %id, "Deleted product from draft");
        self.save()?;
        Ok(true)
    }

    /// Write the draft slot.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Storage` if the slot rejects the write.
    pub fn save(&mut self) -> Result<(), AdminError> {
        let json = serde_json::to_string(&self.products)?;
        if let Err(e) = self.storage.set(&self.key, &json) {
            warn!(key = %self.key, error = %e, "Failed to save catalog draft");
            return Err(e.into());
        }
        self.source = DraftSource::Draft;
        Ok(())
    }

    /// The products in published-file format.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Encode` if serialization fails.
    pub fn export_json(&self) -> Result<String, AdminError> {
        Ok(serde_json::to_string_pretty(&self.products)?)
    }

    /// Write the published catalog file. The draft is kept.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Publish` if the file cannot be written.
    pub fn publish(&self, path: impl AsRef<Path>) -> Result<(), AdminError> {
        let path = path.as_ref();
        let json = self.export_json()?;
        std::fs::write(path, json).map_err(|source| AdminError::Publish {
            path: path.display().to_string(),
            source,
        })?;
        info!(path = %path.display(), products = self.products.len(), "Published catalog");
        Ok(())
    }

    /// Discard the draft and go back to `published`.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Storage` if the slot cannot be cleared; the draft
    /// is left as it was.
    pub fn reset(&mut self, published: Vec<Product>) -> Result<(), AdminError> {
        self.storage.remove(&self.key)?;
        self.products = published;
        self.source = DraftSource::Published;
        info!(key = %self.key, "Reset catalog draft to published version");
        Ok(())
    }

    /// Borrow the backing store.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Drop the draft and return the backing store.
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn new_product_id(&self, slug: &str, millis: i64) -> ProductId {
        let mut stamp = millis;
        loop {
            let id = ProductId::new(format!("{slug}-{stamp}"));
            if self.get(&id).is_none() {
                return id;
            }
            stamp += 1;
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use coaxx_storage::MemoryStore;

    use super::*;

    fn published() -> Vec<Product> {
        let mut robe = Product::new("robe", "Silk Robe", Decimal::from(80));
        robe.category = Some("loungewear".to_string());
        robe.collections = vec!["Bridal".to_string()];
        robe.tags = vec![Tag::named("Sleepwear")];
        let mut mask = Product::new("mask", "Velvet Mask", Decimal::from(20));
        mask.experience_level = Some("Beginner".to_string());
        vec![robe, mask]
    }

    fn draft() -> CatalogDraft<MemoryStore> {
        CatalogDraft::open(MemoryStore::new(), DEFAULT_DRAFT_KEY, published())
    }

    #[test]
    fn test_open_without_draft_uses_published() {
        let draft = draft();
        assert_eq!(draft.source(), DraftSource::Published);
        assert_eq!(draft.products().len(), 2);
    }

    #[test]
    fn test_upsert_new_product() {
        let mut draft = draft();
        let mut input = ProductInput::new("  Lace Garter  ", Decimal::new(1250, 2));
        input.tags = split_list("Bridal, Accessories,, ");
        input.compare_at_price = Some(Decimal::ZERO);

        let id = draft.upsert(input).unwrap();

        assert!(id.as_str().starts_with("lace-garter-"));
        let product = draft.get(&id).unwrap();
        assert_eq!(product.name, "Lace Garter");
        assert_eq!(product.slug.as_deref(), Some("lace-garter"));
        assert_eq!(product.tags.len(), 2);
        assert!(product.has_tag("accessories"));
        assert_eq!(product.compare_at_price, None);
        assert!(product.created_at.is_some());
        assert_eq!(draft.source(), DraftSource::Draft);
        assert!(draft.storage().get(DEFAULT_DRAFT_KEY).unwrap().is_some());
    }

    #[test]
    fn test_new_ids_are_unique() {
        let mut draft = draft();
        let a = draft.upsert(ProductInput::new("Garter", Decimal::ONE)).unwrap();
        let b = draft.upsert(ProductInput::new("Garter", Decimal::ONE)).unwrap();
        assert_ne!(a, b);
        assert_eq!(draft.products().len(), 4);
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut draft = draft();
        let mut input = ProductInput::from_product(draft.get(&ProductId::new("robe")).unwrap());
        input.price = Decimal::from(70);
        input.slug = Some("silk-robe-classic".to_string());

        let id = draft.upsert(input).unwrap();

        assert_eq!(id, ProductId::new("robe"));
        assert_eq!(draft.products().len(), 2);
        let robe = draft.products().first().unwrap();
        assert_eq!(robe.price, Decimal::from(70));
        assert_eq!(robe.slug.as_deref(), Some("silk-robe-classic"));
        assert!(robe.has_tag("sleepwear"));
    }

    #[test]
    fn test_edit_keeps_discount_and_legacy_image() {
        let mut mask = Product::new("mask", "Velvet Mask", Decimal::from(20));
        mask.sale_price = Some(Decimal::from(15));
        mask.image_url = Some("/img/mask.jpg".to_string());
        let mut draft = CatalogDraft::open(MemoryStore::new(), DEFAULT_DRAFT_KEY, vec![mask]);

        let mut input = ProductInput::from_product(draft.get(&ProductId::new("mask")).unwrap());
        input.description = Some("Now with a satin lining".to_string());
        draft.upsert(input).unwrap();

        let after = draft.get(&ProductId::new("mask")).unwrap();
        assert_eq!(after.sale_price, Some(Decimal::from(15)));
        assert_eq!(after.effective_price(), Decimal::from(15));
        assert_eq!(after.image_url.as_deref(), Some("/img/mask.jpg"));
        assert_eq!(after.description.as_deref(), Some("Now with a satin lining"));
    }

    #[test]
    fn test_zero_sale_price_clears_discount() {
        let mut mask = Product::new("mask", "Velvet Mask", Decimal::from(20));
        mask.sale_price = Some(Decimal::from(15));
        let mut draft = CatalogDraft::open(MemoryStore::new(), DEFAULT_DRAFT_KEY, vec![mask]);

        let mut input = ProductInput::from_product(draft.get(&ProductId::new("mask")).unwrap());
        input.sale_price = Some(Decimal::ZERO);
        draft.upsert(input).unwrap();

        let after = draft.get(&ProductId::new("mask")).unwrap();
        assert_eq!(after.sale_price, None);
        assert_eq!(after.effective_price(), Decimal::from(20));
    }

    #[test]
    fn test_edit_keeps_unmodelled_catalog_fields() {
        let published: Vec<Product> = serde_json::from_str(
            r#"[{"id": "kit", "name": "Rope Kit", "price": 45,
                 "experienceLevel": "Beginner",
                 "materials": ["jute"], "paymentLink": "https://pay.example.com/kit",
                 "subscription": {"billingInterval": "month"}, "isNew": true}]"#,
        )
        .unwrap();
        let mut draft = CatalogDraft::open(MemoryStore::new(), DEFAULT_DRAFT_KEY, published);

        let mut input = ProductInput::from_product(draft.get(&ProductId::new("kit")).unwrap());
        input.price = Decimal::from(40);
        draft.upsert(input).unwrap();

        let json = draft.export_json().unwrap();
        for field in ["materials", "paymentLink", "subscription", "isNew"] {
            assert!(json.contains(field), "{field} missing from export");
        }
        let kit = draft.get(&ProductId::new("kit")).unwrap();
        assert_eq!(kit.price, Decimal::from(40));
        assert_eq!(kit.experience_level.as_deref(), Some("Beginner"));
    }

    #[test]
    fn test_upsert_validation() {
        let mut draft = draft();
        let err = draft.upsert(ProductInput::new("   ", Decimal::ONE)).unwrap_err();
        assert!(matches!(err, AdminError::InvalidProduct(_)));

        let err = draft
            .upsert(ProductInput::new("Robe", Decimal::from(-1)))
            .unwrap_err();
        assert!(matches!(err, AdminError::InvalidProduct(_)));

        let mut input = ProductInput::new("Ghost", Decimal::ONE);
        input.id = Some(ProductId::new("ghost"));
        assert!(matches!(
            draft.upsert(input).unwrap_err(),
            AdminError::NotFound(_)
        ));

        assert_eq!(draft.source(), DraftSource::Published);
    }

    #[test]
    fn test_delete() {
        let mut draft = draft();
        assert!(draft.delete(&ProductId::new("mask")).unwrap());
        assert!(!draft.delete(&ProductId::new("mask")).unwrap());
        assert_eq!(draft.products().len(), 1);
    }

    #[test]
    fn test_draft_survives_reopen() {
        let mut draft = draft();
        draft.delete(&ProductId::new("mask")).unwrap();
        let storage = draft.into_storage();

        let reopened = CatalogDraft::open(storage, DEFAULT_DRAFT_KEY, published());
        assert_eq!(reopened.source(), DraftSource::Draft);
        assert_eq!(reopened.products().len(), 1);
    }

    #[test]
    fn test_corrupt_draft_falls_back_to_published() {
        let mut storage = MemoryStore::new();
        storage.set(DEFAULT_DRAFT_KEY, "not json").unwrap();
        let draft = CatalogDraft::open(storage, DEFAULT_DRAFT_KEY, published());
        assert_eq!(draft.source(), DraftSource::Published);
        assert_eq!(draft.products().len(), 2);
    }

    #[test]
    fn test_reset_discards_draft() {
        let mut draft = draft();
        draft.delete(&ProductId::new("mask")).unwrap();

        draft.reset(published()).unwrap();

        assert_eq!(draft.source(), DraftSource::Published);
        assert_eq!(draft.products().len(), 2);
        assert!(draft.storage().get(DEFAULT_DRAFT_KEY).unwrap().is_none());
    }

    #[test]
    fn test_save_failure_keeps_edit() {
        let mut draft = CatalogDraft::open(MemoryStore::with_quota(16), DEFAULT_DRAFT_KEY, published());
        let err = draft.delete(&ProductId::new("mask")).unwrap_err();
        assert!(matches!(err, AdminError::Storage(_)));
        assert_eq!(draft.products().len(), 1);
        assert_eq!(draft.source(), DraftSource::Published);
    }

    #[test]
    fn test_filter() {
        let draft = draft();
        let ids = |filter: DraftFilter| -> Vec<String> {
            draft
                .filter(&filter)
                .iter()
                .map(|p| p.id.to_string())
                .collect()
        };

        assert_eq!(ids(DraftFilter::default()).len(), 2);
        assert_eq!(
            ids(DraftFilter {
                search: Some("SLEEP".to_string()),
                ..DraftFilter::default()
            }),
            vec!["robe"]
        );
        assert_eq!(
            ids(DraftFilter {
                category: Some("Loungewear".to_string()),
                ..DraftFilter::default()
            }),
            vec!["robe"]
        );
        assert!(
            ids(DraftFilter {
                collection: Some("Holiday".to_string()),
                ..DraftFilter::default()
            })
            .is_empty()
        );
        assert_eq!(
            ids(DraftFilter {
                experience_level: Some("beginner".to_string()),
                ..DraftFilter::default()
            }),
            vec!["mask"]
        );
        assert_eq!(
            ids(DraftFilter {
                experience_level: Some("all".to_string()),
                ..DraftFilter::default()
            })
            .len(),
            2
        );
    }

    #[test]
    fn test_publish_writes_readable_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.json");
        let draft = draft();

        draft.publish(&path).unwrap();

        let written: Vec<Product> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, draft.products());
        assert!(draft.export_json().unwrap().contains("\n  "));
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(" a, b ,,c "), vec!["a", "b", "c"]);
        assert!(split_list("").is_empty());
    }
}
