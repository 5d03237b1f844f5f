//! Catalog Domain Models
//!
//! Strict shapes for products and listing pages. Upstream JSON is decoded
//! into these types at the proxy boundary; anything that cannot be decoded
//! is rejected there instead of leaking loosely typed data inward.

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Product identifier as issued by the upstream commerce API.
pub type ProductId = u64;

// =============================================================================
// Product
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BrandRef {
    pub id: u64,
    pub brand_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryRef {
    pub id: u64,
    pub category_name: String,
}

/// Image descriptor. Every field may be null; the descriptor itself never is
/// once a product has passed through [`Product`] deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProductImage {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub images_id: Option<String>,
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default, deserialize_with = "opt_flag")]
    pub is_primary: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub product_name: String,
    #[serde(default)]
    pub product_code: String,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub qr_code: Option<String>,
    pub brand: BrandRef,
    pub category: CategoryRef,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(deserialize_with = "price")]
    pub selling_price: f64,
    #[serde(default)]
    pub is_active: Option<i64>,
    /// Absent or null upstream images become the null-filled placeholder.
    #[serde(default, deserialize_with = "images_or_placeholder")]
    pub images: ProductImage,

    /// Upstream fields this service does not interpret, passed through as-is
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

// =============================================================================
// Listing
// =============================================================================

/// One page of a product listing, with every pagination field present.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListingPage {
    pub data: Vec<Product>,
    pub current_page: u32,
    pub last_page: u32,
    pub per_page: u32,
    pub total: u64,
}

/// Listing body as the upstream sends it; pagination fields may be missing.
#[derive(Debug, Deserialize)]
pub struct RawListing {
    pub data: Vec<Product>,
    #[serde(default, deserialize_with = "opt_u64")]
    pub current_page: Option<u64>,
    #[serde(default, deserialize_with = "opt_u64")]
    pub last_page: Option<u64>,
    #[serde(default, deserialize_with = "opt_u64")]
    pub per_page: Option<u64>,
    #[serde(default, deserialize_with = "opt_u64")]
    pub total: Option<u64>,
}

/// Which slice of the catalog a listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListingScope {
    All,
    Category(u64),
    Brand(u64),
}

impl ListingScope {
    /// Path below the upstream base URL, without query string.
    pub fn upstream_path(&self) -> String {
        match self {
            ListingScope::All => "/api/v1/products".to_string(),
            ListingScope::Category(id) => format!("/api/v1/products/category/{id}"),
            ListingScope::Brand(id) => format!("/api/v1/products/brand/{id}"),
        }
    }
}

/// Validated pagination request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

/// Raw `?page=&per_page=` query, parsed by hand so bad values become our
/// own 400 body rather than an extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub per_page: Option<String>,
}

// =============================================================================
// Deserialization helpers
// =============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Int(u64),
    Float(f64),
    Text(String),
    Flag(bool),
}

fn price<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    let value = match Loose::deserialize(d)? {
        Loose::Int(n) => n as f64,
        Loose::Float(f) => f,
        Loose::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| de::Error::custom(format!("invalid price: {s:?}")))?,
        Loose::Flag(_) => return Err(de::Error::custom("invalid price: boolean")),
    };

    if !value.is_finite() || value < 0.0 {
        return Err(de::Error::custom(format!("invalid price: {value}")));
    }
    Ok(value)
}

fn opt_u64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
    match Option::<Loose>::deserialize(d)? {
        None => Ok(None),
        Some(Loose::Int(n)) => Ok(Some(n)),
        Some(Loose::Float(f)) if f >= 0.0 && f.fract() == 0.0 => Ok(Some(f as u64)),
        Some(Loose::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("expected integer, got {s:?}"))),
        Some(_) => Err(de::Error::custom("expected non-negative integer")),
    }
}

fn opt_string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Loose>::deserialize(d)? {
        None => None,
        Some(Loose::Int(n)) => Some(n.to_string()),
        Some(Loose::Float(f)) => Some(f.to_string()),
        Some(Loose::Text(s)) => Some(s),
        Some(Loose::Flag(b)) => Some(b.to_string()),
    })
}

// Upstream encodes booleans as 0/1 as often as true/false.
fn opt_flag<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
    Ok(match Option::<Loose>::deserialize(d)? {
        None => None,
        Some(Loose::Flag(b)) => Some(b),
        Some(Loose::Int(n)) => Some(n != 0),
        Some(Loose::Float(f)) => Some(f != 0.0),
        Some(Loose::Text(s)) => Some(matches!(s.as_str(), "1" | "true")),
    })
}

fn images_or_placeholder<'de, D: Deserializer<'de>>(d: D) -> Result<ProductImage, D::Error> {
    Ok(Option::<ProductImage>::deserialize(d)?.unwrap_or_default())
}
