//! The cart line model: one purchasable `(product, size, color)`
//! combination with a quantity and a pricing snapshot.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::pricing::resolve_unit_price;
use crate::types::{Price, ProductId};

/// Separator in line keys. Variant values come from small fixed option
/// lists (sizes, color names) that never contain it.
const KEY_SEPARATOR: char = '|';

/// Selected variant options for an add operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantOptions {
    pub size: Option<String>,
    pub color: Option<String>,
}

/// One line in the cart.
///
/// Display and pricing fields are snapshots taken from the product at
/// the time of the last add, not live references to the catalog.
/// `unit_price <= original_price` holds by construction: the snapshot
/// comes from the discount resolver, which never raises a price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Deterministic identity: `"{product_id}|{size}|{color}"`.
    pub key: String,
    pub product_id: ProductId,
    pub name: String,
    pub image: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    /// Always `>= 1`; a line that would reach zero is removed instead.
    pub quantity: u32,
    /// Effective price per unit at snapshot time.
    pub unit_price: Price,
    /// Base catalog price at snapshot time, for strike-through display.
    pub original_price: Price,
    /// Discount source snapshots for badge rendering; `None` when no
    /// discount applied.
    pub discount_price_seen: Option<Price>,
    pub discount_percent_seen: Option<Decimal>,
}

impl CartLine {
    /// Subtotal for this line.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// Build the identity key for a `(product, size, color)` combination.
///
/// Absent variant fields normalize to the empty string, so `None` and
/// `Some("")` produce the same key component.
#[must_use]
pub fn make_key(product_id: &ProductId, size: Option<&str>, color: Option<&str>) -> String {
    format!(
        "{}{KEY_SEPARATOR}{}{KEY_SEPARATOR}{}",
        product_id,
        size.unwrap_or(""),
        color.unwrap_or("")
    )
}

/// Merge a requested quantity of a product into an existing line
/// collection, returning the new collection.
///
/// If a line with the same key exists its quantity is incremented and
/// its pricing snapshot refreshed (catalog prices may have changed
/// since the line was first created); otherwise a new line is appended.
/// Pure: the caller owns applying and persisting the result.
#[must_use]
pub fn upsert_line(
    lines: &[CartLine],
    product: &Product,
    quantity: u32,
    options: &VariantOptions,
) -> Vec<CartLine> {
    let key = make_key(
        &product.id,
        options.size.as_deref(),
        options.color.as_deref(),
    );
    let resolved = resolve_unit_price(product);

    let mut next: Vec<CartLine> = lines.to_vec();
    if let Some(existing) = next.iter_mut().find(|line| line.key == key) {
        existing.quantity = existing.quantity.saturating_add(quantity);
        existing.unit_price = resolved.unit_price;
        existing.original_price = product.price;
        existing.discount_price_seen = resolved.discount_price_seen;
        existing.discount_percent_seen = resolved.discount_percent_seen;
        return next;
    }

    next.push(CartLine {
        key,
        product_id: product.id.clone(),
        name: product.name.clone(),
        image: product.images.primary().map(str::to_owned),
        size: options.size.clone().filter(|s| !s.is_empty()),
        color: options.color.clone().filter(|c| !c.is_empty()),
        quantity,
        unit_price: resolved.unit_price,
        original_price: product.price,
        discount_price_seen: resolved.discount_price_seen,
        discount_percent_seen: resolved.discount_percent_seen,
    });
    next
}
