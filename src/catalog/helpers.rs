//! Catalog Helpers
//!
//! Pure functions for validating pagination input, normalizing upstream
//! listings, resolving image URLs and picking related products.

use super::models::{PageQuery, PageRequest, Product, ProductId, RawListing, ListingPage};
use crate::{config::Config, error::AppError};
use tracing::warn;

/// Upper bound on related products returned for one product.
pub const RELATED_LIMIT: usize = 10;
/// Page size used when fetching related-product candidates.
pub const RELATED_CANDIDATES: u32 = 20;
/// Related products must be priced within this fraction of the anchor price.
pub const RELATED_PRICE_SPREAD: f64 = 0.3;

/// Validates `?page=&per_page=` against the configured bounds.
pub fn parse_page_request(
    query: &PageQuery,
    default_per_page: u32,
    max_per_page: u32,
) -> Result<PageRequest, AppError> {
    let page = parse_positive(query.page.as_deref(), 1)
        .ok_or_else(|| AppError::InvalidParameter("Invalid page parameter".into()))?;

    let per_page = parse_positive(query.per_page.as_deref(), default_per_page)
        .filter(|n| *n <= max_per_page)
        .ok_or_else(|| AppError::InvalidParameter("Invalid per_page parameter".into()))?;

    Ok(PageRequest { page, per_page })
}

fn parse_positive(raw: Option<&str>, default: u32) -> Option<u32> {
    match raw {
        None => Some(default),
        Some(s) => s.trim().parse::<u32>().ok().filter(|n| *n >= 1),
    }
}

/// Parses a product/category/brand id taken from the URL path.
pub fn parse_id(raw: &str, what: &str) -> Result<u64, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::InvalidParameter(format!("Invalid {what} id")))
}

/// Fills in any pagination field the upstream left out.
///
/// `current_page` and `per_page` fall back to what was requested. A missing
/// `last_page` is derived from `total`. A missing `total` is only tolerated
/// when `estimate_missing_totals` is set. The estimate keeps an upstream
/// `last_page`; without one it always promises one more page so a consumer
/// keeps going until it sees an empty page.
pub fn normalize_listing(
    raw: RawListing,
    request: PageRequest,
    estimate_missing_totals: bool,
) -> Result<ListingPage, AppError> {
    let current_page = to_page_number(raw.current_page, request.page);
    let per_page = to_page_number(raw.per_page, request.per_page);

    let (total, last_page) = match (raw.total, raw.last_page) {
        (Some(total), Some(last)) => (total, clamp_u32(last).max(1)),
        (Some(total), None) => (total, pages_for(total, per_page).max(1)),
        (None, last) if estimate_missing_totals => {
            let total = raw.data.len() as u64 * 2;
            let last = match last {
                Some(last) => clamp_u32(last).max(1),
                None => pages_for(total, per_page).max(current_page.saturating_add(1)),
            };
            warn!(
                page = current_page,
                estimated_total = total,
                "Upstream listing omitted total, using estimate"
            );
            (total, last)
        }
        (None, _) => {
            return Err(AppError::MalformedResponse(
                "listing response is missing `total`".into(),
            ))
        }
    };

    Ok(ListingPage {
        data: raw.data,
        current_page,
        last_page,
        per_page,
        total,
    })
}

fn to_page_number(value: Option<u64>, fallback: u32) -> u32 {
    value
        .map(clamp_u32)
        .filter(|n| *n >= 1)
        .unwrap_or(fallback)
}

fn clamp_u32(n: u64) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

fn pages_for(total: u64, per_page: u32) -> u32 {
    clamp_u32(total.div_ceil(u64::from(per_page.max(1))))
}

/// Full image URL for a product, or the configured fallback image.
pub fn image_url(config: &Config, product: &Product) -> String {
    resolve_image_url(&config.cdn_base_url, &config.fallback_image, product)
}

pub fn resolve_image_url(cdn_base_url: &str, fallback_image: &str, product: &Product) -> String {
    match product.images.image_path.as_deref().map(str::trim) {
        Some(path) if !path.is_empty() => {
            format!("{}/{}", cdn_base_url, path.trim_start_matches('/'))
        }
        _ => fallback_image.to_string(),
    }
}

/// Picks products similar to `anchor` from `candidates`: same listing,
/// not the anchor itself, price within the spread, first [`RELATED_LIMIT`].
pub fn related_products(anchor: &Product, candidates: Vec<Product>) -> Vec<Product> {
    let min = anchor.selling_price * (1.0 - RELATED_PRICE_SPREAD);
    let max = anchor.selling_price * (1.0 + RELATED_PRICE_SPREAD);
    let anchor_id: ProductId = anchor.id;

    candidates
        .into_iter()
        .filter(|p| p.id != anchor_id && p.selling_price >= min && p.selling_price <= max)
        .take(RELATED_LIMIT)
        .collect()
}
