//! Catalog draft commands.
//!
//! # Usage
//!
//! ```bash
//! # Add a product to the draft
//! coaxx admin upsert --name "Silk Robe" --price 79.99 --collections Bridal
//!
//! # Edit an existing product; unspecified fields keep their values
//! coaxx admin upsert --id silk-robe-1718000000000 --price 69.99
//!
//! # Put it back in stock, un-feature it and drop its sale price
//! coaxx admin upsert --id silk-robe-1718000000000 --in-stock true --featured false --sale-price 0
//!
//! # Publish the draft to COAXX_CATALOG_PATH
//! coaxx admin publish
//! ```
//!
//! # Environment Variables
//!
//! - `COAXX_ADMIN_DATA_DIR` - Directory holding the draft slot
//! - `COAXX_DRAFT_KEY` - Slot key for the draft
//! - `COAXX_CATALOG_PATH` - Published catalog file

use std::path::Path;

use clap::Args;
use coaxx_admin::{AdminConfig, CatalogDraft, DraftFilter, DraftSource, ProductInput, split_list};
use coaxx_core::{Product, ProductId};
use coaxx_storage::FileStore;
use coaxx_storefront::Catalog;
use rust_decimal::Decimal;

use super::{CommandError, render};

type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Fields accepted by `admin upsert`.
#[derive(Debug, Args)]
pub struct UpsertArgs {
    /// Existing product ID to edit
    #[arg(long)]
    pub id: Option<String>,

    /// Product name (required for new products)
    #[arg(short, long)]
    pub name: Option<String>,

    /// List price (required for new products)
    #[arg(short, long)]
    pub price: Option<Decimal>,

    /// URL slug (derived from the name when omitted)
    #[arg(long)]
    pub slug: Option<String>,

    /// Category
    #[arg(long)]
    pub category: Option<String>,

    /// One-line description
    #[arg(long)]
    pub short_description: Option<String>,

    /// Full description
    #[arg(long)]
    pub description: Option<String>,

    /// Discounted price; 0 removes it
    #[arg(long)]
    pub sale_price: Option<Decimal>,

    /// "Was" price shown struck through; 0 removes it
    #[arg(long)]
    pub compare_at: Option<Decimal>,

    /// Units in stock
    #[arg(long)]
    pub stock: Option<u32>,

    /// Whether the product can be bought
    #[arg(long, value_name = "true|false")]
    pub in_stock: Option<bool>,

    /// Feature on the home page
    #[arg(long, value_name = "true|false")]
    pub featured: Option<bool>,

    /// Experience level, e.g. Beginner
    #[arg(long)]
    pub experience: Option<String>,

    /// Comma-separated image URLs
    #[arg(long)]
    pub images: Option<String>,

    /// Single legacy image URL
    #[arg(long)]
    pub image_url: Option<String>,

    /// Comma-separated tags
    #[arg(long)]
    pub tags: Option<String>,

    /// Comma-separated collections
    #[arg(long)]
    pub collections: Option<String>,

    /// Comma-separated colors
    #[arg(long)]
    pub colors: Option<String>,

    /// Comma-separated sizes
    #[arg(long)]
    pub sizes: Option<String>,
}

impl UpsertArgs {
    /// Merge the given options over `base`, or over a blank form.
    fn into_input(self, base: Option<&Product>) -> Result<ProductInput, CommandError> {
        let mut input = match base {
            Some(product) => ProductInput::from_product(product),
            None => ProductInput::new(
                self.name.clone().ok_or(CommandError::MissingOption("name"))?,
                self.price.ok_or(CommandError::MissingOption("price"))?,
            ),
        };

        if let Some(name) = self.name {
            input.name = name;
        }
        if let Some(price) = self.price {
            input.price = price;
        }
        if self.slug.is_some() {
            input.slug = self.slug;
        }
        if self.category.is_some() {
            input.category = self.category;
        }
        if self.short_description.is_some() {
            input.short_description = self.short_description;
        }
        if self.description.is_some() {
            input.description = self.description;
        }
        if self.sale_price.is_some() {
            input.sale_price = self.sale_price;
        }
        if self.compare_at.is_some() {
            input.compare_at_price = self.compare_at;
        }
        if self.stock.is_some() {
            input.stock_quantity = self.stock;
        }
        if self.in_stock.is_some() {
            input.in_stock = self.in_stock;
        }
        if let Some(featured) = self.featured {
            input.featured = featured;
        }
        if self.experience.is_some() {
            input.experience_level = self.experience;
        }
        if self.image_url.is_some() {
            input.image_url = self.image_url;
        }
        for (field, value) in [
            (&mut input.images, self.images),
            (&mut input.tags, self.tags),
            (&mut input.collections, self.collections),
            (&mut input.colors, self.colors),
            (&mut input.sizes, self.sizes),
        ] {
            if let Some(value) = value {
                *field = split_list(&value);
            }
        }
        Ok(input)
    }
}

/// The published catalog, or nothing if it has not been published yet.
fn published_products(config: &AdminConfig) -> Result<Vec<Product>, Box<dyn std::error::Error>> {
    if !config.catalog_path.exists() {
        tracing::info!(path = %config.catalog_path.display(), "No published catalog yet");
        return Ok(Vec::new());
    }
    Ok(Catalog::load(&config.catalog_path)?.products().to_vec())
}

fn open_draft(config: &AdminConfig) -> Result<CatalogDraft<FileStore>, Box<dyn std::error::Error>> {
    let storage = FileStore::open(&config.data_dir)?;
    let published = published_products(config)?;
    let draft = CatalogDraft::open(storage, config.draft_key.as_str(), published);
    if draft.source() == DraftSource::Draft {
        render::message("Editing saved draft (unpublished changes).");
    }
    Ok(draft)
}

/// List draft products.
pub fn list(config: &AdminConfig, filter: &DraftFilter) -> CommandResult {
    let draft = open_draft(config)?;
    let products = draft.filter(filter);
    render::products(&products);
    render::message(&format!(
        "Showing {} of {} products",
        products.len(),
        draft.products().len()
    ));
    Ok(())
}

/// Create or edit a product.
pub fn upsert(config: &AdminConfig, args: UpsertArgs) -> CommandResult {
    let mut draft = open_draft(config)?;
    let base = match &args.id {
        Some(id) => {
            let id = ProductId::new(id.as_str());
            Some(
                draft
                    .get(&id)
                    .cloned()
                    .ok_or_else(|| CommandError::UnknownProduct(id.to_string()))?,
            )
        }
        None => None,
    };

    let id = draft.upsert(args.into_input(base.as_ref())?)?;
    render::message(&format!("Saved product {id} to draft"));
    Ok(())
}

/// Delete a product.
pub fn delete(config: &AdminConfig, id: &str) -> CommandResult {
    let mut draft = open_draft(config)?;
    if draft.delete(&ProductId::new(id))? {
        render::message(&format!("Deleted product {id}"));
        Ok(())
    } else {
        Err(CommandError::UnknownProduct(id.to_string()).into())
    }
}

/// Write the draft to `path`.
pub fn publish(config: &AdminConfig, path: &Path) -> CommandResult {
    let draft = open_draft(config)?;
    draft.publish(path)?;
    render::message(&format!(
        "Published {} products to {}",
        draft.products().len(),
        path.display()
    ));
    Ok(())
}

/// Discard the draft.
pub fn reset(config: &AdminConfig) -> CommandResult {
    let mut draft = open_draft(config)?;
    let published = published_products(config)?;
    draft.reset(published)?;
    render::message("Reset to published catalog.");
    Ok(())
}
