//! Shopping Cart Business Logic Helpers
//!
//! This module contains helper functions for session handling and for
//! shaping cart contents into responses.

use super::{
    models::{CartLineItem, CartLineView, CartSummary},
    store::CartStore,
};
use crate::{catalog::helpers::image_url, config::Config};
use axum::http::{header::COOKIE, HeaderMap};
use uuid::Uuid;

/// Name of the cookie carrying the cart session id.
pub const SESSION_COOKIE: &str = "cart_session";

/// Returns the session id from the request cookie, or a fresh one.
///
/// The flag is `true` when the id was just created and the response must
/// set the cookie.
pub fn resolve_session_id(headers: &HeaderMap) -> (String, bool) {
    match session_from_cookies(headers) {
        Some(id) => (id, false),
        None => (Uuid::new_v4().simple().to_string(), true),
    }
}

fn session_from_cookies(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

pub fn session_cookie(session_id: &str) -> String {
    format!("{SESSION_COOKIE}={session_id}; Path=/; HttpOnly; SameSite=Lax")
}

/// Produces a human-readable one-line summary for a list of line items.
///
/// Example output: `"2x Rice Cooker, 1x Kettle"`.
pub fn format_item_summary<'a>(items: impl IntoIterator<Item = &'a CartLineItem>) -> String {
    items
        .into_iter()
        .map(|i| format!("{}x {}", i.quantity, i.product.product_name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Builds the response body for a cart, resolving each line's image.
pub fn summarize(cart_id: &str, cart: &CartStore, config: &Config) -> CartSummary {
    let items = cart
        .items()
        .map(|item| CartLineView {
            image_url: image_url(config, &item.product),
            item: item.clone(),
        })
        .collect();

    CartSummary {
        cart_id: cart_id.to_string(),
        items,
        item_count: cart.item_count(),
        total: cart.total(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::models::{BrandRef, CategoryRef, Product, ProductImage};
    use axum::http::HeaderValue;
    use serde_json::json;
    use std::collections::HashMap;

    fn test_config() -> Config {
        let vars = HashMap::from([
            ("API_BASE_URL", "https://api.test"),
            ("CDN_BASE_URL", "https://cdn.test"),
            ("FALLBACK_IMAGE", "/img/fallback.png"),
        ]);
        Config::from_lookup(|key: &str| vars.get(key).map(|v| v.to_string())).unwrap()
    }

    #[test]
    fn reads_session_from_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; cart_session=abc123; lang=id"),
        );

        assert_eq!(resolve_session_id(&headers), ("abc123".to_string(), false));
    }

    #[test]
    fn creates_session_when_cookie_missing_or_empty() {
        let (id, created) = resolve_session_id(&HeaderMap::new());
        assert!(created);
        assert_eq!(id.len(), 32);

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("cart_session="));
        assert!(resolve_session_id(&headers).1);
    }

    #[test]
    fn passthrough_fields_never_shadow_line_keys() {
        let product = Product {
            id: 7,
            product_name: "Kettle".into(),
            product_code: "K-7".into(),
            barcode: None,
            qr_code: None,
            brand: BrandRef { id: 1, brand_name: "Brand".into() },
            category: CategoryRef { id: 1, category_name: "Category".into() },
            model: None,
            description: None,
            selling_price: 150.0,
            is_active: Some(1),
            images: ProductImage::default(),
            extra: HashMap::from([
                ("quantity".to_string(), json!(99)),
                ("imageUrl".to_string(), json!("https://elsewhere/x.png")),
                ("weight".to_string(), json!("1kg")),
            ]),
        };

        let mut cart = CartStore::new();
        cart.add_item(product);
        let body = serde_json::to_string(&summarize("s", &cart, &test_config())).unwrap();

        assert_eq!(body.matches("\"quantity\"").count(), 1);
        assert_eq!(body.matches("\"imageUrl\"").count(), 1);
        assert!(body.contains("\"quantity\":1"));
        assert!(body.contains("\"imageUrl\":\"/img/fallback.png\""));
        assert!(body.contains("\"weight\":\"1kg\""));
    }
}
