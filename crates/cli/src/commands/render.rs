//! Terminal output.
#![allow(clippy::print_stdout, clippy::print_stderr)]

use coaxx_core::{Order, Price, Product};
use coaxx_storage::KeyValueStore;
use coaxx_storefront::{CartLine, CartStore, OrderSummary, Persistence, PricingRules};

/// Cart badge, printed by a cart listener after every change.
pub fn badge(lines: &[CartLine]) {
    let count: u64 = lines.iter().map(|line| u64::from(line.quantity)).sum();
    println!("Cart ({count})");
}

pub fn notice(message: &str) {
    eprintln!("notice: {message}");
}

pub fn message(message: &str) {
    println!("{message}");
}

pub fn persistence(persistence: &Persistence) {
    if let Some(warning) = persistence.warning() {
        eprintln!("warning: {warning}");
    }
}

pub fn cart<S: KeyValueStore>(cart: &CartStore<S>, rules: &PricingRules) {
    if cart.is_empty() {
        println!("Your cart is empty.");
        return;
    }

    for line in cart.lines() {
        let variant = line
            .variant
            .as_ref()
            .map(|v| format!(" ({v})"))
            .unwrap_or_default();
        println!(
            "{:>3} x {}{variant}  [{}]  {}",
            line.quantity,
            line.name,
            line.product_id,
            Price::usd(line.line_total())
        );
    }

    let summary = OrderSummary::for_cart(cart, rules);
    println!();
    println!("Subtotal: {}", Price::usd(summary.subtotal));
    if summary.ships_free() {
        println!("Shipping: FREE");
    } else {
        println!("Shipping: {}", Price::usd(summary.shipping));
    }
    println!("Tax:      {}", Price::usd(summary.tax));
    println!("Total:    {}", Price::usd(summary.total));
    if let Some(remaining) = summary.free_shipping_remaining {
        println!("Add {} more for free shipping.", Price::usd(remaining));
    }
}

pub fn products(products: &[&Product]) {
    if products.is_empty() {
        println!("No products found.");
        return;
    }

    for product in products {
        let price = product.effective_price_display();
        let sale = if product.is_on_sale() {
            format!(" (-{}%)", product.discount_percent())
        } else {
            String::new()
        };
        let stock = if product.is_available() {
            ""
        } else {
            "  [out of stock]"
        };
        println!("{:<32} {price}{sale}  {}{stock}", product.id.as_str(), product.name);
    }
}

pub fn order(order: &Order) {
    println!("Order {} ({:?})", order.id, order.status);
    for item in &order.items {
        println!(
            "{:>3} x {}  {}",
            item.quantity,
            item.product_name,
            Price::usd(item.line_total())
        );
    }
    println!("Total: {}", Price::usd(order.total));
}
