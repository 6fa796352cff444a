//! Cart line items and variant keys.

use std::collections::BTreeMap;
use std::fmt;

use coaxx_core::{OrderItem, Product, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Shopper-selected options (color, size, ...) that distinguish otherwise
/// identical additions of the same product.
///
/// Equality is structural: attribute order never matters, and nested values
/// are compared deeply.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Variant(BTreeMap<String, Value>);

impl Variant {
    /// Create an empty variant.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style attribute setter.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Set an attribute.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Look up an attribute.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Whether no attributes are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Attributes in key order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Collapse an empty variant to `None`, so "no options" has one spelling.
    #[must_use]
    pub fn normalize(variant: Option<Self>) -> Option<Self> {
        variant.filter(|v| !v.is_empty())
    }

    /// Convert to a JSON object.
    #[must_use]
    pub fn to_json_map(&self) -> Map<String, Value> {
        self.0
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Variant {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match value {
                Value::String(s) => write!(f, "{key}: {s}")?,
                other => write!(f, "{key}: {other}")?,
            }
        }
        Ok(())
    }
}

/// One row of the cart.
///
/// Name, price and image are a snapshot taken when the product was first
/// added; later catalog edits do not change existing lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    /// Unit price at the time of add.
    pub price: Decimal,
    /// Always at least 1 while the line is in a cart.
    pub quantity: u32,
    #[serde(default, alias = "selectedVariant")]
    pub variant: Option<Variant>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub collections: Vec<String>,
}

impl CartLine {
    /// Snapshot `product` into a new line.
    #[must_use]
    pub fn snapshot(product: &Product, quantity: u32, variant: Option<Variant>) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            price: product.effective_price(),
            quantity,
            variant: Variant::normalize(variant),
            image: product.thumbnail().map(str::to_owned),
            collections: product.collections.clone(),
        }
    }

    /// Whether this line is keyed by `(product_id, variant)`.
    #[must_use]
    pub fn matches(&self, product_id: &ProductId, variant: Option<&Variant>) -> bool {
        self.product_id == *product_id && self.variant.as_ref() == variant
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }

    /// Convert to an order item for checkout.
    #[must_use]
    pub fn to_order_item(&self) -> OrderItem {
        OrderItem {
            product_id: self.product_id.clone(),
            product_name: self.name.clone(),
            variant: self.variant.as_ref().map(Variant::to_json_map),
            quantity: self.quantity,
            price: self.price,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_variant_equality_ignores_key_order() {
        let a: Variant = serde_json::from_str(r#"{"color":"red","size":"M"}"#).unwrap();
        let b: Variant = serde_json::from_str(r#"{"size":"M","color":"red"}"#).unwrap();
        assert_eq!(a, b);

        let nested_a: Variant =
            serde_json::from_value(json!({"engraving": {"font": "serif", "text": "A"}})).unwrap();
        let nested_b: Variant =
            serde_json::from_value(json!({"engraving": {"text": "A", "font": "serif"}})).unwrap();
        assert_eq!(nested_a, nested_b);
    }

    #[test]
    fn test_variant_inequality() {
        let red = Variant::new().with("color", "red");
        let blue = Variant::new().with("color", "blue");
        assert_ne!(red, blue);
        assert_ne!(red, red.clone().with("size", "S"));
    }

    #[test]
    fn test_normalize_empty_variant() {
        assert_eq!(Variant::normalize(Some(Variant::new())), None);
        let red = Variant::new().with("color", "red");
        assert_eq!(Variant::normalize(Some(red.clone())), Some(red));
    }

    #[test]
    fn test_variant_display() {
        let v: Variant = [("size", "M"), ("color", "red")].into_iter().collect();
        assert_eq!(v.to_string(), "color: red, size: M");
        assert_eq!(Variant::new().with("qty_pack", 3).to_string(), "qty_pack: 3");
    }

    #[test]
    fn test_snapshot_records_effective_price_and_thumbnail() {
        let mut product = Product::new("p1", "Satin Slip", Decimal::from(50));
        product.sale_price = Some(Decimal::from(35));
        product.images = vec!["/slip.jpg".to_string()];
        product.collections = vec!["Sleep".to_string()];

        let line = CartLine::snapshot(&product, 2, Some(Variant::new()));
        assert_eq!(line.price, Decimal::from(35));
        assert_eq!(line.image.as_deref(), Some("/slip.jpg"));
        assert_eq!(line.variant, None);
        assert_eq!(line.line_total(), Decimal::from(70));
        assert_eq!(line.collections, vec!["Sleep"]);
    }

    #[test]
    fn test_line_wire_format() {
        let product = Product::new("p1", "Robe", Decimal::new(1999, 2));
        let line = CartLine::snapshot(&product, 1, Some(Variant::new().with("size", "L")));
        let value = serde_json::to_value(&line).unwrap();

        assert_eq!(value["productId"], "p1");
        assert_eq!(value["price"], "19.99");
        assert_eq!(value["variant"], json!({"size": "L"}));
        assert_eq!(value["image"], Value::Null);
    }

    #[test]
    fn test_line_accepts_legacy_selected_variant() {
        let line: CartLine = serde_json::from_value(json!({
            "productId": "p1",
            "name": "Robe",
            "price": 19.99,
            "quantity": 2,
            "selectedVariant": {"color": "black"},
            "image": null
        }))
        .unwrap();

        assert_eq!(line.variant, Some(Variant::new().with("color", "black")));
        assert!(line.collections.is_empty());
    }
}
