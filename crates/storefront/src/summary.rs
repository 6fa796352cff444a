//! Cart page and checkout totals.

use coaxx_core::round_cents;
use coaxx_storage::KeyValueStore;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::cart::CartStore;

/// Shipping and tax rules applied to a subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingRules {
    /// Subtotals strictly above this ship free.
    pub free_shipping_threshold: Decimal,
    /// Shipping charged otherwise.
    pub flat_shipping: Decimal,
    /// Sales tax as a fraction (0.08 = 8%).
    pub tax_rate: Decimal,
}

impl Default for PricingRules {
    fn default() -> Self {
        Self {
            free_shipping_threshold: Decimal::ONE_HUNDRED,
            flat_shipping: Decimal::TEN,
            tax_rate: Decimal::new(8, 2),
        }
    }
}

/// Breakdown shown on the cart and checkout pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    /// How much more the shopper needs to spend for free shipping.
    pub free_shipping_remaining: Option<Decimal>,
}

impl OrderSummary {
    /// Apply `rules` to a subtotal.
    #[must_use]
    pub fn for_subtotal(subtotal: Decimal, rules: &PricingRules) -> Self {
        let shipping = if subtotal > rules.free_shipping_threshold {
            Decimal::ZERO
        } else {
            rules.flat_shipping
        };
        let tax = round_cents(subtotal * rules.tax_rate);
        let free_shipping_remaining = (shipping > Decimal::ZERO
            && subtotal < rules.free_shipping_threshold)
            .then(|| rules.free_shipping_threshold - subtotal);

        Self {
            subtotal,
            shipping,
            tax,
            total: subtotal + shipping + tax,
            free_shipping_remaining,
        }
    }

    /// Summarize the current contents of `cart`.
    #[must_use]
    pub fn for_cart<S: KeyValueStore>(cart: &CartStore<S>, rules: &PricingRules) -> Self {
        Self::for_subtotal(cart.total(), rules)
    }

    /// Whether shipping is free.
    #[must_use]
    pub fn ships_free(&self) -> bool {
        self.shipping.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(subtotal: Decimal) -> OrderSummary {
        OrderSummary::for_subtotal(subtotal, &PricingRules::default())
    }

    #[test]
    fn test_below_threshold_charges_shipping() {
        let s = summary(Decimal::from(35));
        assert_eq!(s.shipping, Decimal::TEN);
        assert_eq!(s.tax, Decimal::new(280, 2));
        assert_eq!(s.total, Decimal::new(4780, 2));
        assert_eq!(s.free_shipping_remaining, Some(Decimal::from(65)));
        assert!(!s.ships_free());
    }

    #[test]
    fn test_exactly_threshold_still_charges_shipping() {
        let s = summary(Decimal::ONE_HUNDRED);
        assert_eq!(s.shipping, Decimal::TEN);
        assert_eq!(s.free_shipping_remaining, None);
    }

    #[test]
    fn test_above_threshold_ships_free() {
        let s = summary(Decimal::new(10_001, 2));
        assert!(s.ships_free());
        assert_eq!(s.free_shipping_remaining, None);
        assert_eq!(s.tax, Decimal::new(800, 2));
        assert_eq!(s.total, Decimal::new(10_801, 2));
    }

    #[test]
    fn test_tax_rounds_to_cents() {
        // 19.99 * 0.08 = 1.5992
        let s = summary(Decimal::new(1999, 2));
        assert_eq!(s.tax, Decimal::new(160, 2));
    }

    #[test]
    fn test_custom_rules() {
        let rules = PricingRules {
            free_shipping_threshold: Decimal::from(50),
            flat_shipping: Decimal::new(499, 2),
            tax_rate: Decimal::ZERO,
        };
        let s = OrderSummary::for_subtotal(Decimal::from(20), &rules);
        assert_eq!(s.total, Decimal::new(2499, 2));
        assert_eq!(s.free_shipping_remaining, Some(Decimal::from(30)));
    }
}
