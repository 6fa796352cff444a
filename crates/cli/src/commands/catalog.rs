//! Catalog commands.

use coaxx_core::Product;
use coaxx_storefront::{CatalogQuery, StorefrontConfig};

use super::{load_catalog, render};

/// List products matching `query`.
///
/// `--deals` lists deepest discount first; everything else keeps catalog
/// order.
pub fn list(config: &StorefrontConfig, query: &CatalogQuery) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = load_catalog(config)?;
    let mut products: Vec<&Product> = query.apply(&catalog);
    if query.deals_only {
        products.sort_by_key(|product| std::cmp::Reverse(product.discount_percent()));
    }
    render::products(&products);
    Ok(())
}
