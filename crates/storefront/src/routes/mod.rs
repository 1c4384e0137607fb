//! Route handlers and router assembly.

pub mod cart;
pub mod sales;

use axum::Router;
use axum::routing::{get, patch, post};

use crate::state::AppState;

/// Build the API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(cart::show).delete(cart::clear))
        .route("/cart/items", post(cart::add))
        .route("/cart/items/{key}", patch(cart::update).delete(cart::remove))
        .route("/cart/checkout-link", get(cart::checkout_link))
        .route("/sales/products", get(sales::search))
        .route("/sales", post(sales::create))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use secrecy::SecretString;
    use tower::ServiceExt;

    use clothing_fit_core::cart::{MemoryStorage, VariantOptions};
    use clothing_fit_core::catalog::Product;

    use crate::config::{AppConfig, CatalogConfig};
    use crate::state::AppState;

    fn test_state() -> AppState {
        let config = AppConfig {
            host: "127.0.0.1".parse().expect("addr"),
            port: 3000,
            catalog: CatalogConfig {
                base_url: "https://catalog.example".to_string(),
                api_key: SecretString::from("sk-test-key"),
            },
            whatsapp_number: "573045378344".to_string(),
            cart_store_dir: PathBuf::from("data"),
            sentry_dsn: None,
        };
        AppState::with_storage(config, Arc::new(MemoryStorage::new()))
    }

    fn app(state: AppState) -> axum::Router {
        super::routes().with_state(state)
    }

    fn hoodie() -> Product {
        serde_json::from_value(serde_json::json!({
            "id": "p-1", "name": "Hoodie", "price": 100_000, "discount_price": 80_000
        }))
        .expect("product")
    }

    async fn body_json(body: Body) -> serde_json::Value {
        let bytes = to_bytes(body, usize::MAX).await.expect("body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn test_empty_cart_snapshot() {
        let response = app(test_state())
            .oneshot(
                Request::builder()
                    .uri("/cart")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response.into_body()).await;
        assert_eq!(json["items"], serde_json::json!([]));
        assert_eq!(json["total"], "$0");
        assert_eq!(json["total_count"], 0);
    }

    #[tokio::test]
    async fn test_cart_snapshot_renders_discount() {
        let state = test_state();
        state
            .cart()
            .add(&hoodie(), 2, &VariantOptions::default())
            .expect("add");

        let response = app(state)
            .oneshot(
                Request::builder()
                    .uri("/cart")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        let json = body_json(response.into_body()).await;
        assert_eq!(json["total"], "$160.000");
        assert_eq!(json["total_count"], 2);
        assert_eq!(json["items"][0]["unit_price"], "$80.000");
        assert_eq!(json["items"][0]["original_price"], "$100.000");
        assert_eq!(json["items"][0]["badge_percent"], 20);
    }

    #[tokio::test]
    async fn test_update_unknown_line_is_unprocessable() {
        let response = app(test_state())
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri("/cart/items/p-9%7C%7C")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"quantity": 3}"#))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_rejected_combined_override_leaves_cart_unchanged() {
        let state = test_state();
        state
            .cart()
            .add(&hoodie(), 2, &VariantOptions::default())
            .expect("add");

        let response = app(state.clone())
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri("/cart/items/p-1%7C%7C")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"quantity": 5, "unit_price": -100}"#))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        // The valid quantity half of the request must not have landed
        let cart = state.cart();
        assert_eq!(cart.lines().first().map(|l| l.quantity), Some(2));
        assert_eq!(cart.total_count(), 2);
    }

    #[tokio::test]
    async fn test_update_without_fields_is_bad_request() {
        let response = app(test_state())
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri("/cart/items/p-1%7C%7C")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{}"))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_remove_unknown_line_is_ok() {
        let response = app(test_state())
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/cart/items/p-9%7C%7C")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_checkout_link_rejects_empty_cart() {
        let response = app(test_state())
            .oneshot(
                Request::builder()
                    .uri("/cart/checkout-link")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_checkout_link_for_stocked_cart() {
        let state = test_state();
        state
            .cart()
            .add(&hoodie(), 1, &VariantOptions::default())
            .expect("add");

        let response = app(state)
            .oneshot(
                Request::builder()
                    .uri("/cart/checkout-link?customer_name=Ana")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response.into_body()).await;
        let url = json["url"].as_str().expect("url");
        assert!(url.starts_with("https://wa.me/573045378344?text="));
        let message = json["message"].as_str().expect("message");
        assert!(message.contains("Hola, soy Ana"));
        assert!(message.contains("Total: $80.000"));
    }

    #[tokio::test]
    async fn test_search_without_query_skips_backend() {
        let response = app(test_state())
            .oneshot(
                Request::builder()
                    .uri("/sales/products?q=%20")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response.into_body()).await;
        assert_eq!(json, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_record_sale_rejects_empty_draft() {
        let response = app(test_state())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/sales")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"items": []}"#))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
