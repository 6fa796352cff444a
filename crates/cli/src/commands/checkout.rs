//! Checkout command.

use coaxx_storefront::{CustomerDetails, StorefrontConfig, checkout};

use super::{open_cart, render};

/// Place a pending order for the cart and empty it.
pub fn place_order(
    config: &StorefrontConfig,
    customer: &CustomerDetails,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut cart = open_cart(config)?;
    let _badge = cart.subscribe(render::badge);

    let receipt = checkout(&mut cart, customer, &config.pricing)?;

    render::persistence(&receipt.persistence);
    render::order(&receipt.order);
    render::message("No payment was taken; the order is pending.");
    Ok(())
}
