//! Sale drafts for the admin sale-entry flow.
//!
//! An operator builds a sale from cart-style lines (searched at their
//! effective price, with manual quantity/price overrides) and the
//! draft is forwarded to the sale-recording collaborator. Recording,
//! stock adjustment and reporting are entirely the collaborator's
//! responsibility; this module only shapes and validates the payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::CartLine;
use crate::types::{Price, ProductId};

/// Where the sale originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaleChannel {
    #[default]
    Whatsapp,
    Tienda,
    Otro,
}

/// Accepted payment methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Efectivo,
    Tarjeta,
    Bancolombia,
    Nequi,
    Daviplata,
    Otro,
}

/// One sale entry, in the exact shape the recording collaborator
/// accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleItem {
    pub product_id: ProductId,
    pub qty: u32,
    pub price: Price,
}

impl From<&CartLine> for SaleItem {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id.clone(),
            qty: line.quantity,
            price: line.unit_price,
        }
    }
}

/// A sale ready to be recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleDraft {
    pub customer_name: Option<String>,
    pub channel: SaleChannel,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    pub items: Vec<SaleItem>,
    pub created_at: DateTime<Utc>,
}

/// Validation errors for a sale draft.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SaleError {
    /// A sale needs at least one item.
    #[error("sale has no items")]
    Empty,

    /// An item carried a non-positive quantity.
    #[error("invalid quantity for product {0}")]
    InvalidQuantity(ProductId),

    /// An item carried a negative price.
    #[error("invalid price for product {0}")]
    InvalidPrice(ProductId),
}

impl SaleDraft {
    /// Build a draft from the current cart lines.
    #[must_use]
    pub fn from_cart(
        lines: &[CartLine],
        customer_name: Option<String>,
        channel: SaleChannel,
        payment_method: PaymentMethod,
        notes: Option<String>,
    ) -> Self {
        Self {
            customer_name,
            channel,
            payment_method,
            notes,
            items: lines.iter().map(SaleItem::from).collect(),
            created_at: Utc::now(),
        }
    }

    /// Grand total across the draft's items.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(|item| item.price.times(item.qty)).sum()
    }

    /// Check the draft before handing it to the recording collaborator.
    ///
    /// # Errors
    ///
    /// Returns the first [`SaleError`] found: an empty draft, a zero
    /// quantity, or a negative price.
    pub fn validate(&self) -> Result<(), SaleError> {
        if self.items.is_empty() {
            return Err(SaleError::Empty);
        }
        for item in &self.items {
            if item.qty < 1 {
                return Err(SaleError::InvalidQuantity(item.product_id.clone()));
            }
            if item.price.is_negative() {
                return Err(SaleError::InvalidPrice(item.product_id.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{VariantOptions, upsert_line};
    use crate::catalog::Product;

    fn lines() -> Vec<CartLine> {
        let p: Product = serde_json::from_value(serde_json::json!({
            "id": "p-1", "name": "Hoodie", "price": 100_000, "discount_price": 80_000
        }))
        .expect("product");
        upsert_line(&[], &p, 2, &VariantOptions::default())
    }

    #[test]
    fn test_sale_item_from_cart_line_uses_snapshot_price() {
        let lines = lines();
        let item = SaleItem::from(lines.first().expect("line"));
        assert_eq!(item.product_id, ProductId::new("p-1"));
        assert_eq!(item.qty, 2);
        assert_eq!(item.price, Price::from_pesos(80_000));
    }

    #[test]
    fn test_draft_total_and_validate() {
        let draft = SaleDraft::from_cart(
            &lines(),
            Some("Ana".to_owned()),
            SaleChannel::Tienda,
            PaymentMethod::Nequi,
            None,
        );
        assert_eq!(draft.total(), Price::from_pesos(160_000));
        assert_eq!(draft.validate(), Ok(()));
    }

    #[test]
    fn test_empty_draft_rejected() {
        let draft = SaleDraft::from_cart(
            &[],
            None,
            SaleChannel::default(),
            PaymentMethod::default(),
            None,
        );
        assert_eq!(draft.validate(), Err(SaleError::Empty));
    }

    #[test]
    fn test_invalid_item_rejected() {
        let mut draft = SaleDraft::from_cart(
            &lines(),
            None,
            SaleChannel::default(),
            PaymentMethod::default(),
            None,
        );
        if let Some(item) = draft.items.first_mut() {
            item.price = Price::from_pesos(-100);
        }
        assert_eq!(
            draft.validate(),
            Err(SaleError::InvalidPrice(ProductId::new("p-1")))
        );
    }

    #[test]
    fn test_wire_shape() {
        let draft = SaleDraft::from_cart(
            &lines(),
            None,
            SaleChannel::Whatsapp,
            PaymentMethod::Daviplata,
            None,
        );
        let json = serde_json::to_value(&draft).expect("serialize");
        assert_eq!(json["channel"], "whatsapp");
        assert_eq!(json["payment_method"], "daviplata");
        assert_eq!(json["items"][0]["qty"], 2);
    }
}
