//! Sale-entry route handlers.
//!
//! Backs the operator flow for recording sales made outside the
//! storefront (WhatsApp, in person): search the catalog at effective
//! prices, then submit a validated draft to the backend's recording
//! procedure.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use clothing_fit_core::pricing::{badge_percent, resolve_unit_price};
use clothing_fit_core::sale::{PaymentMethod, SaleChannel, SaleDraft, SaleItem};
use clothing_fit_core::types::{Price, ProductId};

use crate::error::Result;
use crate::state::AppState;

/// Product search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// One product search hit, priced for the sale-entry picker.
#[derive(Debug, Serialize)]
pub struct ProductSearchView {
    pub product_id: String,
    pub name: String,
    pub image: Option<String>,
    pub stock: Option<i64>,
    /// Base catalog price.
    pub price: String,
    /// Effective price after discount resolution.
    pub effective_price: String,
    pub has_discount: bool,
    pub badge_percent: Option<u32>,
}

/// Record sale request body.
#[derive(Debug, Deserialize)]
pub struct RecordSaleRequest {
    pub customer_name: Option<String>,
    #[serde(default)]
    pub channel: SaleChannel,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    pub items: Vec<SaleItemRequest>,
}

/// One sale item as submitted by the operator, price in whole pesos.
#[derive(Debug, Deserialize)]
pub struct SaleItemRequest {
    pub product_id: ProductId,
    pub qty: u32,
    pub price: i64,
}

/// Record sale response.
#[derive(Debug, Serialize)]
pub struct SaleRecordedView {
    pub sale_no: String,
    pub total: String,
}

/// Search active products by name for the sale-entry picker.
///
/// An empty or missing query returns no rows without touching the
/// backend.
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<ProductSearchView>>> {
    let q = query.q.as_deref().map(str::trim).unwrap_or_default();
    if q.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let products = state.catalog().search_products(q).await?;
    let hits = products
        .iter()
        .map(|product| {
            let resolved = resolve_unit_price(product);
            ProductSearchView {
                product_id: product.id.to_string(),
                name: product.name.clone(),
                image: product.images.primary().map(str::to_owned),
                stock: product.stock,
                price: format!("${}", product.price.format_cop()),
                effective_price: format!("${}", resolved.unit_price.format_cop()),
                has_discount: resolved.has_discount(),
                badge_percent: badge_percent(product.price, &resolved),
            }
        })
        .collect();
    Ok(Json(hits))
}

/// Validate and record a sale through the catalog backend.
#[instrument(skip(state, request))]
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<RecordSaleRequest>,
) -> Result<(StatusCode, Json<SaleRecordedView>)> {
    let draft = SaleDraft {
        customer_name: request.customer_name,
        channel: request.channel,
        payment_method: request.payment_method,
        notes: request.notes,
        items: request
            .items
            .into_iter()
            .map(|item| SaleItem {
                product_id: item.product_id,
                qty: item.qty,
                price: Price::from_pesos(item.price),
            })
            .collect(),
        created_at: Utc::now(),
    };
    draft.validate()?;

    state.catalog().record_sale(&draft).await?;

    let view = SaleRecordedView {
        sale_no: sale_number(&draft),
        total: format!("${}", draft.total().format_cop()),
    };
    Ok((StatusCode::CREATED, Json(view)))
}

/// Human-friendly receipt number derived from the draft timestamp.
fn sale_number(draft: &SaleDraft) -> String {
    format!("S{:08}", draft.created_at.timestamp_millis() % 100_000_000)
}
