//! Product proxy route handlers
//!
//! Each route forwards one GET to the upstream commerce API and answers with
//! the normalized body, or a uniform `{error}` body on failure.

use super::{helpers::*, models::*};
use crate::{error::AppError, state::SharedState};
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tracing::info;

/// Creates routes for product listing and detail operations
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/api/products", get(list_products))
        .route("/api/products/:id", get(get_product))
        .route("/api/products/:id/related", get(related))
        .route("/api/products/category/:id", get(list_by_category))
        .route("/api/products/brand/:id", get(list_by_brand))
}

/// Endpoint: GET /api/products?page&per_page
async fn list_products(
    State(state): State<SharedState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ListingPage>, AppError> {
    listing(&state, ListingScope::All, &query).await
}

/// Endpoint: GET /api/products/category/:id?page&per_page
async fn list_by_category(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ListingPage>, AppError> {
    let id = parse_id(&id, "category")?;
    listing(&state, ListingScope::Category(id), &query).await
}

/// Endpoint: GET /api/products/brand/:id?page&per_page
async fn list_by_brand(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ListingPage>, AppError> {
    let id = parse_id(&id, "brand")?;
    listing(&state, ListingScope::Brand(id), &query).await
}

async fn listing(
    state: &SharedState,
    scope: ListingScope,
    query: &PageQuery,
) -> Result<Json<ListingPage>, AppError> {
    let request = parse_page_request(
        query,
        state.config.default_per_page,
        state.config.max_per_page,
    )?;

    let page = state.upstream.fetch_listing(scope, request).await?;
    Ok(Json(page))
}

/// Endpoint: GET /api/products/:id
async fn get_product(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, AppError> {
    let id = parse_id(&id, "product")?;
    let product = state.upstream.fetch_product(id).await?;
    info!(product_id = product.id, "Fetched product details");
    Ok(Json(product))
}

/// Endpoint: GET /api/products/:id/related
/// Products from the same category in a similar price band.
async fn related(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id, "product")?;
    let anchor = state.upstream.fetch_product(id).await?;

    let candidates = state
        .upstream
        .fetch_listing(
            ListingScope::Category(anchor.category.id),
            PageRequest {
                page: 1,
                per_page: RELATED_CANDIDATES,
            },
        )
        .await?;

    let products = related_products(&anchor, candidates.data);
    Ok(Json(json!({ "data": products })))
}
