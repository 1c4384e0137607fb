//! Catalog REST client implementation.
//!
//! Speaks the hosted backend's PostgREST conventions (`id=eq.{id}`,
//! `name=ilike.*{q}*`) with `reqwest`. Product-by-id lookups are cached
//! with `moka` (60-second TTL) since listing pages hammer the same
//! handful of rows.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use secrecy::ExposeSecret;
use tracing::instrument;

use clothing_fit_core::catalog::Product;
use clothing_fit_core::sale::SaleDraft;
use clothing_fit_core::types::ProductId;

use super::CatalogError;
use crate::config::CatalogConfig;

/// Columns the engine depends on; keeps responses lean.
const PRODUCT_COLUMNS: &str = "id,name,price,discount_price,discount_percent,custom_attrs,images,stock";

/// Client for the hosted catalog backend.
///
/// Cheaply cloneable; product-by-id lookups are cached for one minute.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    product_cache: Cache<String, Product>,
}

impl CatalogClient {
    /// Create a new catalog client.
    #[must_use]
    pub fn new(config: &CatalogConfig) -> Self {
        let product_cache = Cache::builder()
            .max_capacity(500)
            .time_to_live(Duration::from_secs(60))
            .build();

        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.trim_end_matches('/').to_string(),
                api_key: config.api_key.expose_secret().to_string(),
                product_cache,
            }),
        }
    }

    /// Fetch a product row by id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] when no row matches, or a
    /// transport/backend error.
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, CatalogError> {
        if let Some(product) = self.inner.product_cache.get(id.as_str()).await {
            return Ok(product);
        }

        let rows: Vec<Product> = self
            .get_rows(&[
                ("select", PRODUCT_COLUMNS),
                ("id", &format!("eq.{id}")),
                ("limit", "1"),
            ])
            .await?;

        let product = rows
            .into_iter()
            .next()
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;

        self.inner
            .product_cache
            .insert(id.as_str().to_owned(), product.clone())
            .await;
        Ok(product)
    }

    /// Search active products by name, newest first, at most 10 rows.
    ///
    /// # Errors
    ///
    /// Returns a transport/backend error; an empty result is `Ok`.
    #[instrument(skip(self))]
    pub async fn search_products(&self, query: &str) -> Result<Vec<Product>, CatalogError> {
        let pattern = format!("ilike.*{}*", query.trim());
        self.get_rows(&[
            ("select", PRODUCT_COLUMNS),
            ("active", "eq.true"),
            ("name", &pattern),
            ("order", "created_at.desc"),
            ("limit", "10"),
        ])
        .await
    }

    /// Record a sale through the backend's `create_sale` procedure.
    ///
    /// The backend owns stock adjustment and reporting; this only
    /// forwards the validated draft.
    ///
    /// # Errors
    ///
    /// Returns a transport/backend error when the call is rejected.
    #[instrument(skip(self, draft))]
    pub async fn record_sale(&self, draft: &SaleDraft) -> Result<(), CatalogError> {
        let payload = serde_json::json!({
            "p_customer_name": draft.customer_name,
            "p_channel": draft.channel,
            "p_payment_method": draft.payment_method,
            "p_notes": draft.notes,
            "p_items": draft.items,
        });

        let url = format!("{}/rest/v1/rpc/create_sale", self.inner.base_url);
        let response = self
            .inner
            .client
            .post(&url)
            .header("apikey", &self.inner.api_key)
            .bearer_auth(&self.inner.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(backend_error(status, message));
        }
        Ok(())
    }

    /// Execute a GET against the products table with the given query
    /// pairs.
    async fn get_rows(&self, query: &[(&str, &str)]) -> Result<Vec<Product>, CatalogError> {
        let url = format!("{}/rest/v1/products", self.inner.base_url);
        let response = self
            .inner
            .client
            .get(&url)
            .header("apikey", &self.inner.api_key)
            .bearer_auth(&self.inner.api_key)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "catalog backend returned non-success status"
            );
            return Err(backend_error(status, body));
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })
    }
}

fn backend_error(status: reqwest::StatusCode, message: String) -> CatalogError {
    CatalogError::Backend {
        status: status.as_u16(),
        message: message.chars().take(200).collect(),
    }
}
