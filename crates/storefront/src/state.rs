//! Application state shared across handlers.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use clothing_fit_core::cart::{Cart, CartStorage};

use crate::catalog::CatalogClient;
use crate::config::AppConfig;
use crate::storage::JsonFileStorage;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Holds the process-wide cart: the
/// persisted slot is single-writer, so one in-memory cart guarded by a
/// mutex is the whole concurrency story (handlers never hold the lock
/// across an await point).
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    catalog: CatalogClient,
    cart: Mutex<Cart>,
}

impl AppState {
    /// Create application state, hydrating the cart from the
    /// configured file slot.
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        let storage = Arc::new(JsonFileStorage::new(config.cart_store_dir.clone()));
        Self::with_storage(config, storage)
    }

    /// Create application state over an explicit storage backend
    /// (used by tests).
    #[must_use]
    pub fn with_storage(config: AppConfig, storage: Arc<dyn CartStorage>) -> Self {
        let catalog = CatalogClient::new(&config.catalog);
        let cart = Mutex::new(Cart::load(storage));

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                cart,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Lock the cart for a mutation or snapshot.
    ///
    /// Recovers from a poisoned lock: the cart's invariants hold after
    /// every operation, so a panicking handler cannot leave it
    /// half-updated.
    #[must_use]
    pub fn cart(&self) -> MutexGuard<'_, Cart> {
        self.inner.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
