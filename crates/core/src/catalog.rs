//! Product records as supplied by the catalog collaborator.
//!
//! The engine is read-only over this shape: records arrive as plain
//! JSON rows from the hosted backend and flow into the discount
//! resolver untouched.
//!
//! Discount fields are deserialized leniently on purpose. The catalog
//! stores them inconsistently (numbers, numeric strings, empty strings)
//! and dirty discount data must never make a product row unreadable -
//! a malformed value becomes `None` and pricing degrades to the base
//! price downstream.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::types::{Price, ProductId};

/// A product row from the catalog service.
#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Base unit price in whole pesos. Missing or malformed values
    /// read as zero, matching how the views treat an unpriced row.
    #[serde(default, deserialize_with = "lenient_price")]
    pub price: Price,
    /// Explicit final override price. `None` when absent or malformed.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub discount_price: Option<Decimal>,
    /// Percentage discount in `[0, 100]`. `None` when absent or malformed.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub discount_percent: Option<Decimal>,
    /// Admin-defined free-text label/value pairs. One entry may carry a
    /// discount price under a recognized label spelling.
    #[serde(default)]
    pub custom_attrs: Vec<CustomAttribute>,
    #[serde(default)]
    pub images: ProductImages,
    /// Units on hand, shown in the sale-entry search.
    #[serde(default)]
    pub stock: Option<i64>,
}

/// A free-text label/value pair attached to a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomAttribute {
    #[serde(default)]
    pub label: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub value: String,
}

/// Named image slots for a product.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductImages {
    #[serde(default)]
    pub front: Option<String>,
    #[serde(default)]
    pub back: Option<String>,
    #[serde(default)]
    pub full: Option<String>,
}

impl ProductImages {
    /// The display image for listings and cart lines:
    /// front, falling back to full, then back.
    #[must_use]
    pub fn primary(&self) -> Option<&str> {
        self.front
            .as_deref()
            .or(self.full.as_deref())
            .or(self.back.as_deref())
    }
}

// =============================================================================
// Lenient Deserializers
// =============================================================================

/// Read a decimal from a number or numeric string; anything else is `None`.
fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(decimal_from_value))
}

/// Read a price from a number or numeric string, defaulting to zero.
fn lenient_price<'de, D>(deserializer: D) -> Result<Price, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(decimal_from_value)
        .map_or(Price::ZERO, Price::new))
}

/// Read a string, stringifying bare numbers.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

fn decimal_from_value(value: &serde_json::Value) -> Option<Decimal> {
    match value {
        serde_json::Value::Number(n) => n.to_string().parse::<Decimal>().ok(),
        serde_json::Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<Decimal>().ok()
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Product {
        serde_json::from_str(json).expect("product row should deserialize")
    }

    #[test]
    fn test_minimal_row() {
        let p = parse(r#"{"id": "p-1", "name": "Hoodie"}"#);
        assert_eq!(p.price, Price::ZERO);
        assert!(p.discount_price.is_none());
        assert!(p.discount_percent.is_none());
        assert!(p.custom_attrs.is_empty());
        assert!(p.images.primary().is_none());
    }

    #[test]
    fn test_numeric_string_fields() {
        let p = parse(
            r#"{"id": "p-1", "name": "Hoodie", "price": "100000", "discount_price": "80000"}"#,
        );
        assert_eq!(p.price, Price::from_pesos(100_000));
        assert_eq!(p.discount_price, Some(Decimal::from(80_000)));
    }

    #[test]
    fn test_malformed_discount_fields_become_none() {
        let p = parse(
            r#"{
                "id": "p-1",
                "name": "Hoodie",
                "price": 100000,
                "discount_price": "",
                "discount_percent": "n/a"
            }"#,
        );
        assert_eq!(p.price, Price::from_pesos(100_000));
        assert!(p.discount_price.is_none());
        assert!(p.discount_percent.is_none());
    }

    #[test]
    fn test_custom_attr_numeric_value() {
        let p = parse(
            r#"{
                "id": "p-1",
                "name": "Hoodie",
                "price": 50000,
                "custom_attrs": [{"label": "Precio con descuento", "value": 45000}]
            }"#,
        );
        assert_eq!(p.custom_attrs.first().map(|a| a.value.as_str()), Some("45000"));
    }

    #[test]
    fn test_image_fallback_chain() {
        let p = parse(
            r#"{"id": "p-1", "name": "Hoodie", "images": {"back": "b.jpg", "full": "f.jpg"}}"#,
        );
        assert_eq!(p.images.primary(), Some("f.jpg"));

        let p = parse(r#"{"id": "p-1", "name": "Hoodie", "images": {"back": "b.jpg"}}"#);
        assert_eq!(p.images.primary(), Some("b.jpg"));
    }
}
