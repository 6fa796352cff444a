//! Catalog product types.
//!
//! The catalog file has been written by three different front ends over
//! time, so field names are accepted in both `snake_case` and the older
//! `camelCase` spellings. Serialization always emits `snake_case`.
//!
//! Fields this crate does not model (materials, payment links, care notes
//! and so on) are carried in [`Product::extra`] so that re-publishing a
//! catalog never drops them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::{ProductId, TagId};
use super::price::{CurrencyCode, Price, discount_percent};

/// A product as listed in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(
        default,
        alias = "shortDescription",
        skip_serializing_if = "Option::is_none"
    )]
    pub short_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Current list price.
    pub price: Decimal,
    /// Discounted price, honored only when lower than `price`.
    #[serde(default, alias = "salePrice", skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<Decimal>,
    /// "Was" price shown struck through next to `price`.
    #[serde(
        default,
        alias = "originalPrice",
        skip_serializing_if = "Option::is_none"
    )]
    pub compare_at_price: Option<Decimal>,
    #[serde(default)]
    pub currency: CurrencyCode,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, alias = "imageUrl", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, alias = "inStock", skip_serializing_if = "Option::is_none")]
    pub in_stock: Option<bool>,
    #[serde(
        default,
        alias = "stockQuantity",
        skip_serializing_if = "Option::is_none"
    )]
    pub stock_quantity: Option<u32>,
    #[serde(default, alias = "isFeatured")]
    pub featured: bool,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub collections: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub colors: Vec<String>,
    #[serde(default, alias = "sizesAvailable", skip_serializing_if = "Vec::is_empty")]
    pub sizes: Vec<String>,
    /// Free-form level such as "Beginner" or "Advanced".
    #[serde(
        default,
        alias = "experienceLevel",
        skip_serializing_if = "Option::is_none"
    )]
    pub experience_level: Option<String>,
    #[serde(default, alias = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Every other field from the catalog file, written back unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// Create a minimal product with a list price and nothing else set.
    #[must_use]
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            slug: None,
            category: None,
            short_description: None,
            description: None,
            price,
            sale_price: None,
            compare_at_price: None,
            currency: CurrencyCode::default(),
            images: Vec::new(),
            image_url: None,
            in_stock: None,
            stock_quantity: None,
            featured: false,
            tags: Vec::new(),
            collections: Vec::new(),
            colors: Vec::new(),
            sizes: Vec::new(),
            experience_level: None,
            created_at: None,
            updated_at: None,
            extra: Map::new(),
        }
    }

    /// The price a shopper pays right now.
    ///
    /// The sale price wins only when it is present and strictly lower than
    /// the list price.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        match self.sale_price {
            Some(sale) if sale < self.price => sale,
            _ => self.price,
        }
    }

    /// The highest reference price (list or compare-at).
    #[must_use]
    pub fn list_price(&self) -> Decimal {
        self.compare_at_price
            .map_or(self.price, |was| was.max(self.price))
    }

    /// Whether the shopper pays less than the list price.
    #[must_use]
    pub fn is_on_sale(&self) -> bool {
        self.effective_price() < self.list_price()
    }

    /// Rounded percentage off the list price.
    #[must_use]
    pub fn discount_percent(&self) -> u32 {
        discount_percent(self.list_price(), self.effective_price())
    }

    /// Effective price with the product's currency attached.
    #[must_use]
    pub fn effective_price_display(&self) -> Price {
        Price::new(self.effective_price(), self.currency)
    }

    /// Whether the product can be added to a cart.
    ///
    /// An explicit `in_stock` flag wins; otherwise a known stock quantity
    /// must be positive; a product with neither is available.
    #[must_use]
    pub fn is_available(&self) -> bool {
        match (self.in_stock, self.stock_quantity) {
            (Some(flag), _) => flag,
            (None, Some(quantity)) => quantity > 0,
            (None, None) => true,
        }
    }

    /// Thumbnail URL: first gallery image, else the legacy single image.
    #[must_use]
    pub fn thumbnail(&self) -> Option<&str> {
        self.images
            .first()
            .or(self.image_url.as_ref())
            .map(String::as_str)
    }

    /// Case-insensitive match against name, descriptions, category and tags.
    #[must_use]
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        let contains = |text: &str| text.to_lowercase().contains(&needle);

        contains(&self.name)
            || self.description.as_deref().is_some_and(contains)
            || self.short_description.as_deref().is_some_and(contains)
            || self.category.as_deref().is_some_and(contains)
            || self.tags.iter().any(|tag| contains(&tag.name))
    }

    /// Whether the product carries a tag with the given slug.
    #[must_use]
    pub fn has_tag(&self, slug: &str) -> bool {
        self.tags.iter().any(|tag| tag.slug == slug)
    }

    /// Whether the product has the given experience level (case-insensitive).
    ///
    /// `"all"` matches every product.
    #[must_use]
    pub fn has_experience_level(&self, level: &str) -> bool {
        level.eq_ignore_ascii_case("all")
            || self
                .experience_level
                .as_deref()
                .is_some_and(|own| own.eq_ignore_ascii_case(level))
    }

    /// Whether the product belongs to the named collection (case-insensitive).
    #[must_use]
    pub fn in_collection(&self, name: &str) -> bool {
        self.collections
            .iter()
            .any(|collection| collection.eq_ignore_ascii_case(name))
    }
}

/// A product tag.
///
/// Older catalog files store tags as bare strings; those are accepted and
/// given a slug derived from the name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "TagRepr")]
pub struct Tag {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TagId>,
    pub name: String,
    pub slug: String,
}

impl Tag {
    /// Create a tag from its display name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        let slug = slugify(&name);
        Self {
            id: None,
            name,
            slug,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TagRepr {
    Name(String),
    Full {
        #[serde(default)]
        id: Option<TagId>,
        name: String,
        #[serde(default)]
        slug: Option<String>,
    },
}

impl From<TagRepr> for Tag {
    fn from(repr: TagRepr) -> Self {
        match repr {
            TagRepr::Name(name) => Self::named(name),
            TagRepr::Full { id, name, slug } => {
                let slug = slug.unwrap_or_else(|| slugify(&name));
                Self { id, name, slug }
            }
        }
    }
}

/// Turn a display name into a URL slug.
///
/// Lowercases, drops punctuation, and collapses runs of whitespace,
/// underscores and hyphens into a single hyphen.
///
/// ```
/// use coaxx_core::slugify;
///
/// assert_eq!(slugify("Silk & Lace Robe"), "silk-lace-robe");
/// assert_eq!(slugify("  __Hello--World__ "), "hello-world");
/// ```
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else if c.is_whitespace() || c == '_' || c == '-' {
            pending_dash = true;
        }
    }

    slug
}
