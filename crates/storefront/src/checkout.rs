//! Checkout stub.
//!
//! Turns the current cart into a pending [`Order`] and empties the cart. No
//! payment provider is contacted; the order is handed back to the caller.

use chrono::Utc;
use coaxx_core::{Email, Order, OrderStatus};
use coaxx_storage::KeyValueStore;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cart::{CartLine, CartStore, Persistence};
use crate::error::CheckoutError;
use crate::summary::{OrderSummary, PricingRules};

/// Shipping and contact details collected on the checkout form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    #[serde(default = "default_country")]
    pub country: String,
}

fn default_country() -> String {
    "US".to_string()
}

impl CustomerDetails {
    /// Details with just the required fields set.
    #[must_use]
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
            country: default_country(),
            ..Self::default()
        }
    }

    /// Check the required fields and return the parsed email.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::InvalidEmail` or `CheckoutError::MissingField`.
    pub fn validate(&self) -> Result<Email, CheckoutError> {
        let email = Email::parse(&self.email)?;
        if self.name.trim().is_empty() {
            return Err(CheckoutError::MissingField("name"));
        }
        Ok(email)
    }
}

/// What a successful checkout hands back.
#[derive(Debug)]
pub struct CheckoutReceipt {
    /// The pending order.
    pub order: Order,
    /// Outcome of writing the emptied cart.
    pub persistence: Persistence,
}

/// Place a pending order for everything in `cart`, then empty the cart.
///
/// # Errors
///
/// - `CheckoutError::EmptyCart` if the cart has no lines
/// - `CheckoutError::InvalidEmail` / `CheckoutError::MissingField` if the
///   customer details are incomplete
///
/// On error the cart is left untouched.
pub fn checkout<S: KeyValueStore>(
    cart: &mut CartStore<S>,
    customer: &CustomerDetails,
    rules: &PricingRules,
) -> Result<CheckoutReceipt, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    let email = customer.validate()?;

    let summary = OrderSummary::for_cart(cart, rules);
    let order = Order {
        id: Order::new_id(),
        customer_email: email,
        customer_name: Some(customer.name.trim().to_string()),
        items: cart.lines().iter().map(CartLine::to_order_item).collect(),
        subtotal: summary.subtotal,
        shipping: summary.shipping,
        tax: summary.tax,
        total: summary.total,
        status: OrderStatus::Pending,
        created_at: Utc::now(),
    };

    info!(
        order_id = %order.id,
        items = order.item_count(),
        total = %order.total,
        "Order placed"
    );

    let persistence = cart.clear_cart();
    Ok(CheckoutReceipt { order, persistence })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use coaxx_core::{EmailError, Product};
    use coaxx_storage::MemoryStore;
    use rust_decimal::Decimal;

    use super::*;
    use crate::cart::Variant;

    fn cart_with(items: &[(&str, i64, u32)]) -> CartStore<MemoryStore> {
        let mut cart = CartStore::open_default(MemoryStore::new());
        for (id, price, qty) in items {
            let product = Product::new(*id, format!("Product {id}"), Decimal::from(*price));
            cart.add_item(&product, *qty, None).unwrap();
        }
        cart
    }

    fn customer() -> CustomerDetails {
        CustomerDetails::new("jane@example.com", "Jane Doe")
    }

    #[test]
    fn test_checkout_builds_pending_order_and_clears_cart() {
        let mut cart = cart_with(&[("a", 10, 2), ("b", 5, 3)]);

        let receipt = checkout(&mut cart, &customer(), &PricingRules::default()).unwrap();

        let order = receipt.order;
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.item_count(), 5);
        assert_eq!(order.subtotal, Decimal::from(35));
        assert_eq!(order.shipping, Decimal::TEN);
        assert_eq!(order.tax, Decimal::new(280, 2));
        assert_eq!(order.total, Decimal::new(4780, 2));
        assert_eq!(order.customer_email.as_str(), "jane@example.com");
        assert!(receipt.persistence.is_saved());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_checkout_keeps_variant_on_order_item() {
        let mut cart = CartStore::open_default(MemoryStore::new());
        let product = Product::new("robe", "Robe", Decimal::from(50));
        cart.add_item(&product, 1, Some(Variant::new().with("size", "M")))
            .unwrap();

        let receipt = checkout(&mut cart, &customer(), &PricingRules::default()).unwrap();

        let item = receipt.order.items.first().unwrap();
        let variant = item.variant.as_ref().unwrap();
        assert_eq!(variant.get("size").unwrap(), "M");
    }

    #[test]
    fn test_empty_cart_rejected() {
        let mut cart = cart_with(&[]);
        let err = checkout(&mut cart, &customer(), &PricingRules::default()).unwrap_err();
        assert!(matches!(err, CheckoutError::EmptyCart));
    }

    #[test]
    fn test_invalid_details_leave_cart_untouched() {
        let mut cart = cart_with(&[("a", 10, 1)]);
        let notified = std::rc::Rc::new(std::cell::Cell::new(false));
        let _sub = {
            let notified = std::rc::Rc::clone(&notified);
            cart.subscribe(move |_| notified.set(true))
        };

        let too_long = format!("{}@example.com", "j".repeat(243));
        for email in ["", "no-at-sign", "@example.com", "jane@", "a@b@c", too_long.as_str()] {
            let details = CustomerDetails::new(email, "Jane");
            let err = checkout(&mut cart, &details, &PricingRules::default()).unwrap_err();
            assert!(matches!(err, CheckoutError::InvalidEmail(_)), "{email}");
        }

        let details = CustomerDetails::new("jane@example.com", "   ");
        let err = checkout(&mut cart, &details, &PricingRules::default()).unwrap_err();
        assert!(matches!(err, CheckoutError::MissingField("name")));

        assert_eq!(cart.item_count(), 1);
        assert!(!notified.get());
    }

    #[test]
    fn test_order_ids_are_unique() {
        let mut cart = cart_with(&[("a", 10, 1)]);
        let first = checkout(&mut cart, &customer(), &PricingRules::default()).unwrap();
        cart.add_item(&Product::new("a", "A", Decimal::TEN), 1, None)
            .unwrap();
        let second = checkout(&mut cart, &customer(), &PricingRules::default()).unwrap();
        assert_ne!(first.order.id, second.order.id);
    }

    #[test]
    fn test_customer_details_default_country() {
        let details: CustomerDetails =
            serde_json::from_str(r#"{"email": "a@b.c", "name": "A"}"#).unwrap();
        assert_eq!(details.country, "US");
        assert_eq!(details.validate().unwrap().as_str(), "a@b.c");
    }

    #[test]
    fn test_email_errors_name_the_rule() {
        let details = CustomerDetails::new("a@b@c", "A");
        let err = details.validate().unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::InvalidEmail(EmailError::MultipleAtSymbols)
        ));
        assert_eq!(
            err.to_string(),
            "invalid email address: email must contain exactly one @ symbol"
        );

        let details = CustomerDetails::new(format!("{}@example.com", "a".repeat(243)), "A");
        assert!(matches!(
            details.validate().unwrap_err(),
            CheckoutError::InvalidEmail(EmailError::TooLong { max: 254 })
        ));
    }
}
