//! REST API handlers for shopping cart operations
//!
//! Every endpoint resolves the caller's session from the `cart_session`
//! cookie (issuing one if absent) and answers with the full cart summary.

use super::{helpers::*, models::*, store::CartStore};
use crate::{
    catalog::{helpers::parse_id, models::Product},
    error::AppError,
    state::SharedState,
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header::SET_COOKIE, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use tracing::{info, warn};

/// Creates routes for cart-related operations
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/api/cart", get(get_cart).delete(clear_cart))
        .route("/api/cart/items", post(add_item))
        .route("/api/cart/items/:id", patch(update_quantity).delete(remove_item))
}

/// Endpoint: GET /api/cart
async fn get_cart(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let (session_id, is_new_session) = resolve_session_id(&headers);
    let cart = state.carts.snapshot(&session_id);
    respond(&state, &session_id, is_new_session, &cart)
}

/// Endpoint: POST /api/cart/items
/// Body: a product as returned by the catalog routes.
async fn add_item(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Result<Json<Product>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(product) = body.map_err(|e| {
        warn!("Invalid cart item: {}", e.body_text());
        AppError::InvalidParameter("Invalid product payload".into())
    })?;

    let (session_id, is_new_session) = resolve_session_id(&headers);
    let product_id = product.id;
    let cart = state.carts.with_cart(&session_id, |cart| {
        cart.add_item(product);
        cart.clone()
    });

    info!(session = %session_id, product_id, items = cart.item_count(), "Added to cart");
    Ok(respond(&state, &session_id, is_new_session, &cart))
}

/// Endpoint: PATCH /api/cart/items/:id
/// Body: `{"quantity": n}`; `n < 1` removes the line.
async fn update_quantity(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    body: Result<Json<UpdateQuantityInput>, JsonRejection>,
) -> Result<Response, AppError> {
    let product_id = parse_id(&id, "product")?;
    let Json(input) = body.map_err(|e| {
        warn!("Invalid quantity update: {}", e.body_text());
        AppError::InvalidParameter("Invalid quantity payload".into())
    })?;

    let (session_id, is_new_session) = resolve_session_id(&headers);
    let cart = state.carts.with_cart(&session_id, |cart| {
        cart.update_quantity(product_id, input.quantity);
        cart.clone()
    });

    Ok(respond(&state, &session_id, is_new_session, &cart))
}

/// Endpoint: DELETE /api/cart/items/:id
async fn remove_item(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let product_id = parse_id(&id, "product")?;

    let (session_id, is_new_session) = resolve_session_id(&headers);
    let cart = state.carts.with_cart(&session_id, |cart| {
        cart.remove_item(product_id);
        cart.clone()
    });

    Ok(respond(&state, &session_id, is_new_session, &cart))
}

/// Endpoint: DELETE /api/cart
/// Empties the cart and ends its session storage.
async fn clear_cart(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let (session_id, is_new_session) = resolve_session_id(&headers);

    if let Some(cart) = state.carts.end_session(&session_id) {
        info!(
            session = %session_id,
            "Cleared cart: {}",
            format_item_summary(cart.items())
        );
    }

    respond(&state, &session_id, is_new_session, &CartStore::new())
}

fn respond(state: &SharedState, session_id: &str, is_new_session: bool, cart: &CartStore) -> Response {
    let mut response = Json(summarize(session_id, cart, &state.config)).into_response();

    if is_new_session {
        if let Ok(cookie) = HeaderValue::from_str(&session_cookie(session_id)) {
            response.headers_mut().insert(SET_COOKIE, cookie);
        }
    }

    response
}
