//! Cart commands.
//!
//! Each invocation opens the persisted cart, registers the badge listener,
//! applies one mutation and prints the result.
//!
//! # Environment Variables
//!
//! - `COAXX_DATA_DIR` - Directory holding the cart slot
//! - `COAXX_CART_KEY` - Slot key for the cart
//! - `COAXX_CATALOG_PATH` - Catalog consulted by `cart add`

use coaxx_core::ProductId;
use coaxx_storage::FileStore;
use coaxx_storefront::{CartStore, Persistence, StorefrontConfig, Subscription};

use super::{CommandError, load_catalog, open_cart, render, variant_from};

type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Open the cart with the badge listener attached.
fn open_with_badge(
    config: &StorefrontConfig,
) -> Result<(CartStore<FileStore>, Subscription), Box<dyn std::error::Error>> {
    let cart = open_cart(config)?;
    let badge = cart.subscribe(render::badge);
    Ok((cart, badge))
}

fn finish(cart: &CartStore<FileStore>, config: &StorefrontConfig, persistence: &Persistence) {
    render::persistence(persistence);
    render::cart(cart, &config.pricing);
}

/// Print the cart.
pub fn show(config: &StorefrontConfig) -> CommandResult {
    let cart = open_cart(config)?;
    render::cart(&cart, &config.pricing);
    Ok(())
}

/// Add a catalog product.
pub fn add(
    config: &StorefrontConfig,
    product_id: &str,
    quantity: u32,
    variant: Vec<(String, String)>,
) -> CommandResult {
    let catalog = load_catalog(config)?;
    let product = catalog
        .get(&ProductId::new(product_id))
        .ok_or_else(|| CommandError::UnknownProduct(product_id.to_string()))?;

    let (mut cart, _badge) = open_with_badge(config)?;
    let persistence = cart.add_item(product, quantity, variant_from(variant))?;
    tracing::info!(product_id, quantity, "Added to cart");
    finish(&cart, config, &persistence);
    Ok(())
}

/// Remove a line.
pub fn remove(
    config: &StorefrontConfig,
    product_id: &str,
    variant: Vec<(String, String)>,
) -> CommandResult {
    let (mut cart, _badge) = open_with_badge(config)?;
    let variant = variant_from(variant);
    let persistence = cart.remove_item(&ProductId::new(product_id), variant.as_ref());
    finish(&cart, config, &persistence);
    Ok(())
}

/// Set a line's quantity.
pub fn update(
    config: &StorefrontConfig,
    product_id: &str,
    quantity: i64,
    variant: Vec<(String, String)>,
) -> CommandResult {
    let (mut cart, _badge) = open_with_badge(config)?;
    let variant = variant_from(variant);
    let persistence = cart.update_quantity(&ProductId::new(product_id), quantity, variant.as_ref());
    finish(&cart, config, &persistence);
    Ok(())
}

/// Empty the cart.
pub fn clear(config: &StorefrontConfig) -> CommandResult {
    let (mut cart, _badge) = open_with_badge(config)?;
    let persistence = cart.clear_cart();
    finish(&cart, config, &persistence);
    Ok(())
}
