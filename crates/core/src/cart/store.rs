//! The cart store: an ordered, persisted collection of cart lines.

use std::sync::Arc;

use crate::catalog::Product;
use crate::types::Price;

use super::error::CartError;
use super::line::{CartLine, VariantOptions, upsert_line};
use super::storage::CartStorage;

/// Fixed storage identifier for the persisted cart slot.
pub const CART_STORAGE_KEY: &str = "cart_v1";

/// The cart store.
///
/// Lines keep insertion order; re-adding an existing key merges in
/// place without reordering. Totals are always recomputed from the
/// lines, never cached. Every successful mutation writes the full line
/// collection through the storage backend; a failed write is logged
/// and the in-memory state stays authoritative for the session.
///
/// The persisted slot is process-wide and single-writer: concurrent
/// processes each hold an independent copy and the last write wins.
pub struct Cart {
    lines: Vec<CartLine>,
    storage: Arc<dyn CartStorage>,
}

impl std::fmt::Debug for Cart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cart").field("lines", &self.lines).finish()
    }
}

impl Cart {
    /// Hydrate a cart from persisted state.
    ///
    /// An absent payload starts an empty cart; a corrupt payload is
    /// treated the same, with a warning.
    #[must_use]
    pub fn load(storage: Arc<dyn CartStorage>) -> Self {
        let lines = match storage.read(CART_STORAGE_KEY) {
            Ok(Some(payload)) => match serde_json::from_str::<Vec<CartLine>>(&payload) {
                Ok(lines) => lines,
                Err(e) => {
                    tracing::warn!(error = %e, "corrupt persisted cart, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read persisted cart, starting empty");
                Vec::new()
            }
        };
        Self { lines, storage }
    }

    /// The current lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Grand total, recomputed from the lines on every call.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Total unit count across all lines.
    #[must_use]
    pub fn total_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Add `quantity` units of a product variant, merging into an
    /// existing line when the `(product, size, color)` key matches.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] for a zero quantity; the
    /// cart is unchanged.
    pub fn add(
        &mut self,
        product: &Product,
        quantity: u32,
        options: &VariantOptions,
    ) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity(0));
        }
        self.lines = upsert_line(&self.lines, product, quantity, options);
        self.persist();
        Ok(())
    }

    /// Directly set a line's quantity (sale-entry override).
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] for a quantity below 1
    /// (use [`Cart::remove`] to delete a line) and
    /// [`CartError::LineNotFound`] for an unknown key; the cart is
    /// unchanged in both cases.
    pub fn set_quantity(&mut self, key: &str, quantity: u32) -> Result<(), CartError> {
        self.update_line(key, Some(quantity), None)
    }

    /// Directly set a line's unit price (sale-entry override), without
    /// touching the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidPrice`] for a negative price and
    /// [`CartError::LineNotFound`] for an unknown key; the cart is
    /// unchanged in both cases.
    pub fn set_unit_price(&mut self, key: &str, price: Price) -> Result<(), CartError> {
        self.update_line(key, None, Some(price))
    }

    /// Apply quantity and/or unit-price overrides to a line as one
    /// operation. Every input is validated before the line is touched,
    /// so a rejected combination leaves both fields unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] for a quantity below 1,
    /// [`CartError::InvalidPrice`] for a negative price, and
    /// [`CartError::LineNotFound`] for an unknown key; the cart is
    /// unchanged in all cases.
    pub fn update_line(
        &mut self,
        key: &str,
        quantity: Option<u32>,
        price: Option<Price>,
    ) -> Result<(), CartError> {
        if let Some(quantity) = quantity
            && quantity < 1
        {
            return Err(CartError::InvalidQuantity(i64::from(quantity)));
        }
        if let Some(price) = price
            && price.is_negative()
        {
            return Err(CartError::InvalidPrice(price.amount().to_string()));
        }
        let line = self
            .lines
            .iter_mut()
            .find(|line| line.key == key)
            .ok_or_else(|| CartError::LineNotFound(key.to_owned()))?;
        if let Some(quantity) = quantity {
            line.quantity = quantity;
        }
        if let Some(price) = price {
            line.unit_price = price;
        }
        self.persist();
        Ok(())
    }

    /// Remove the line with the given key. A no-op when absent.
    pub fn remove(&mut self, key: &str) {
        let before = self.lines.len();
        self.lines.retain(|line| line.key != key);
        if self.lines.len() != before {
            self.persist();
        }
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.persist();
    }

    /// Serialize the full line collection to the persisted slot.
    ///
    /// Write failures are reported, not propagated: the cart remains
    /// usable for the rest of the session.
    fn persist(&self) {
        let payload = match serde_json::to_string(&self.lines) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize cart for persistence");
                return;
            }
        };
        if let Err(e) = self.storage.write(CART_STORAGE_KEY, &payload) {
            tracing::warn!(error = %e, "failed to persist cart, in-memory state kept");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::storage::{MemoryStorage, StorageError};

    fn product(json: serde_json::Value) -> Product {
        serde_json::from_value(json).expect("test product")
    }

    fn empty_cart() -> Cart {
        Cart::load(Arc::new(MemoryStorage::new()))
    }

    #[test]
    fn test_add_and_totals() {
        let mut cart = empty_cart();
        let p = product(serde_json::json!({
            "id": "p-1", "name": "Hoodie", "price": 100_000, "discount_price": 80_000
        }));
        cart.add(&p, 2, &VariantOptions::default()).expect("add");
        assert_eq!(cart.total(), Price::from_pesos(160_000));
        assert_eq!(cart.total_count(), 2);
    }

    #[test]
    fn test_add_zero_quantity_rejected() {
        let mut cart = empty_cart();
        let p = product(serde_json::json!({"id": "p-1", "name": "Hoodie", "price": 100_000}));
        assert_eq!(
            cart.add(&p, 0, &VariantOptions::default()),
            Err(CartError::InvalidQuantity(0))
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_zero_rejected() {
        // Scenario E
        let mut cart = empty_cart();
        let p = product(serde_json::json!({"id": "p-1", "name": "Hoodie", "price": 100_000}));
        cart.add(&p, 2, &VariantOptions::default()).expect("add");
        assert_eq!(
            cart.set_quantity("p-1||", 0),
            Err(CartError::InvalidQuantity(0))
        );
        assert_eq!(cart.total_count(), 2);
    }

    #[test]
    fn test_set_quantity_unknown_key() {
        let mut cart = empty_cart();
        assert_eq!(
            cart.set_quantity("missing||", 3),
            Err(CartError::LineNotFound("missing||".to_owned()))
        );
    }

    #[test]
    fn test_set_unit_price_reflected_in_total() {
        // P6: total is recomputed, never cached
        let mut cart = empty_cart();
        let p = product(serde_json::json!({"id": "p-1", "name": "Hoodie", "price": 100_000}));
        cart.add(&p, 2, &VariantOptions::default()).expect("add");
        assert_eq!(cart.total(), Price::from_pesos(200_000));

        cart.set_unit_price("p-1||", Price::from_pesos(90_000))
            .expect("override");
        assert_eq!(cart.total(), Price::from_pesos(180_000));
    }

    #[test]
    fn test_update_line_rejects_combination_without_partial_apply() {
        let mut cart = empty_cart();
        let p = product(serde_json::json!({"id": "p-1", "name": "Hoodie", "price": 100_000}));
        cart.add(&p, 2, &VariantOptions::default()).expect("add");

        // A valid quantity paired with an invalid price must not land
        assert!(matches!(
            cart.update_line("p-1||", Some(5), Some(Price::from_pesos(-100))),
            Err(CartError::InvalidPrice(_))
        ));
        let line = cart.lines().first().expect("line");
        assert_eq!(line.quantity, 2);
        assert_eq!(line.unit_price, Price::from_pesos(100_000));

        // And the mirror case: valid price, invalid quantity
        assert_eq!(
            cart.update_line("p-1||", Some(0), Some(Price::from_pesos(90_000))),
            Err(CartError::InvalidQuantity(0))
        );
        let line = cart.lines().first().expect("line");
        assert_eq!(line.quantity, 2);
        assert_eq!(line.unit_price, Price::from_pesos(100_000));

        // Both valid applies both
        cart.update_line("p-1||", Some(3), Some(Price::from_pesos(90_000)))
            .expect("combined override");
        assert_eq!(cart.total(), Price::from_pesos(270_000));
    }

    #[test]
    fn test_set_unit_price_negative_rejected() {
        let mut cart = empty_cart();
        let p = product(serde_json::json!({"id": "p-1", "name": "Hoodie", "price": 100_000}));
        cart.add(&p, 1, &VariantOptions::default()).expect("add");
        assert!(matches!(
            cart.set_unit_price("p-1||", Price::from_pesos(-1)),
            Err(CartError::InvalidPrice(_))
        ));
        assert_eq!(cart.total(), Price::from_pesos(100_000));
    }

    #[test]
    fn test_remove_absent_key_is_noop() {
        // Scenario D
        let mut cart = empty_cart();
        let p = product(serde_json::json!({"id": "p-1", "name": "Hoodie", "price": 100_000}));
        cart.add(&p, 1, &VariantOptions::default()).expect("add");
        cart.remove("not-there||");
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut cart = empty_cart();
        let p = product(serde_json::json!({"id": "p-1", "name": "Hoodie", "price": 100_000}));
        cart.add(&p, 1, &VariantOptions::default()).expect("add");
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Price::ZERO);
    }

    #[test]
    fn test_reload_sees_persisted_lines() {
        let storage = Arc::new(MemoryStorage::new());
        let p = product(serde_json::json!({"id": "p-1", "name": "Hoodie", "price": 100_000}));

        let mut cart = Cart::load(Arc::clone(&storage) as Arc<dyn CartStorage>);
        cart.add(&p, 2, &VariantOptions::default()).expect("add");

        let reloaded = Cart::load(storage);
        assert_eq!(reloaded.lines().len(), 1);
        assert_eq!(reloaded.total_count(), 2);
    }

    #[test]
    fn test_corrupt_payload_hydrates_empty() {
        let storage = Arc::new(MemoryStorage::with_payload(CART_STORAGE_KEY, "{not json"));
        let cart = Cart::load(storage);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_write_failure_keeps_in_memory_state() {
        struct FailingWrites;

        impl CartStorage for FailingWrites {
            fn read(&self, _key: &str) -> Result<Option<String>, StorageError> {
                Ok(None)
            }

            fn write(&self, _key: &str, _payload: &str) -> Result<(), StorageError> {
                Err(StorageError::Other("quota exceeded".to_owned()))
            }
        }

        let mut cart = Cart::load(Arc::new(FailingWrites));
        let p = product(serde_json::json!({"id": "p-1", "name": "Hoodie", "price": 100_000}));
        cart.add(&p, 1, &VariantOptions::default()).expect("add succeeds despite write failure");
        assert_eq!(cart.total_count(), 1);
    }
}
