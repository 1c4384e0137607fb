//! Cart route handlers.
//!
//! Thin JSON wrappers over the core cart store: every handler returns
//! the updated cart view so clients can re-render without a second
//! request. The checkout link handler renders the WhatsApp handoff URL.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use clothing_fit_core::cart::{Cart, CartLine, VariantOptions};
use clothing_fit_core::checkout::{build_order_summary, whatsapp_order_url};
use clothing_fit_core::pricing::{ResolvedPrice, badge_percent};
use clothing_fit_core::types::{Price, ProductId};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineView {
    pub key: String,
    pub product_id: String,
    pub name: String,
    pub image: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub quantity: u32,
    pub unit_price: String,
    /// Base price at snapshot time, present only when a discount
    /// applied (for strike-through rendering).
    pub original_price: Option<String>,
    pub line_total: String,
    pub badge_percent: Option<u32>,
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub total: String,
    pub total_count: u32,
}

/// Format a price for display, e.g. `$45.000`.
fn format_price(price: Price) -> String {
    format!("${}", price.format_cop())
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        let resolved = ResolvedPrice {
            unit_price: line.unit_price,
            discount_price_seen: line.discount_price_seen,
            discount_percent_seen: line.discount_percent_seen,
        };
        let discounted = line.unit_price < line.original_price;

        Self {
            key: line.key.clone(),
            product_id: line.product_id.to_string(),
            name: line.name.clone(),
            image: line.image.clone(),
            size: line.size.clone(),
            color: line.color.clone(),
            quantity: line.quantity,
            unit_price: format_price(line.unit_price),
            original_price: discounted.then(|| format_price(line.original_price)),
            line_total: format_price(line.line_total()),
            badge_percent: badge_percent(line.original_price, &resolved),
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.lines().iter().map(CartLineView::from).collect(),
            total: format_price(cart.total()),
            total_count: cart.total_count(),
        }
    }
}

/// Add to cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    pub quantity: Option<u32>,
    pub size: Option<String>,
    pub color: Option<String>,
}

/// Line override request body (sale-entry flow).
#[derive(Debug, Deserialize)]
pub struct UpdateLineRequest {
    pub quantity: Option<u32>,
    /// Unit price override in whole pesos.
    pub unit_price: Option<i64>,
}

/// Checkout link query parameters.
#[derive(Debug, Deserialize)]
pub struct CheckoutQuery {
    pub customer_name: Option<String>,
}

/// Checkout link response.
#[derive(Debug, Serialize)]
pub struct CheckoutLinkView {
    pub url: String,
    pub message: String,
}

/// Current cart snapshot.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<CartView> {
    Json(CartView::from(&*state.cart()))
}

/// Add a product variant to the cart.
///
/// Fetches the product from the catalog so pricing is resolved
/// server-side from the current row, never from client input.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<CartView>> {
    let product = state.catalog().get_product(&request.product_id).await?;
    let options = VariantOptions {
        size: request.size,
        color: request.color,
    };

    let mut cart = state.cart();
    cart.add(&product, request.quantity.unwrap_or(1), &options)?;
    Ok(Json(CartView::from(&*cart)))
}

/// Override a line's quantity and/or unit price.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(request): Json<UpdateLineRequest>,
) -> Result<Json<CartView>> {
    if request.quantity.is_none() && request.unit_price.is_none() {
        return Err(AppError::BadRequest(
            "provide quantity and/or unit_price".to_string(),
        ));
    }

    let mut cart = state.cart();
    cart.update_line(&key, request.quantity, request.unit_price.map(Price::from_pesos))?;
    Ok(Json(CartView::from(&*cart)))
}

/// Remove a line. Idempotent: an unknown key is not an error.
#[instrument(skip(state))]
pub async fn remove(State(state): State<AppState>, Path(key): Path<String>) -> Json<CartView> {
    let mut cart = state.cart();
    cart.remove(&key);
    Json(CartView::from(&*cart))
}

/// Empty the cart.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Json<CartView> {
    let mut cart = state.cart();
    cart.clear();
    Json(CartView::from(&*cart))
}

/// Build the WhatsApp handoff link for the current cart.
#[instrument(skip(state))]
pub async fn checkout_link(
    State(state): State<AppState>,
    Query(query): Query<CheckoutQuery>,
) -> Result<Json<CheckoutLinkView>> {
    let cart = state.cart();
    if cart.is_empty() {
        return Err(AppError::BadRequest("cart is empty".to_string()));
    }

    let message = build_order_summary(cart.lines(), cart.total(), query.customer_name.as_deref());
    let url = whatsapp_order_url(&state.config().whatsapp_number, &message);
    Ok(Json(CheckoutLinkView { url, message }))
}
