//! Cart lines, the cart store, and its persistence boundary.
//!
//! The store is an ordered collection of lines keyed by
//! `(product, size, color)`. Every mutation persists the full line
//! collection through a [`CartStorage`] implementation; the in-memory
//! state stays authoritative when a write fails.

mod error;
mod line;
mod storage;
mod store;

pub use error::CartError;
pub use line::{CartLine, VariantOptions, make_key, upsert_line};
pub use storage::{CartStorage, MemoryStorage, StorageError};
pub use store::{CART_STORAGE_KEY, Cart};
