//! Shopping Cart Domain Models
//!
//! This module contains all data structures related to the shopping cart
//! business domain.

use crate::catalog::models::Product;
use serde::{Deserialize, Serialize};

// =============================================================================
// Cart Domain Models
// =============================================================================

/// A product in the cart together with how many of it were added.
///
/// Serializes as the product's own fields plus `quantity`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CartLineItem {
    #[serde(flatten)]
    pub product: Product,

    /// Always at least 1 while the line exists
    pub quantity: u32,
}

/// Keys a rendered line adds next to the product's own fields.
const LINE_KEYS: [&str; 2] = ["quantity", "imageUrl"];

impl CartLineItem {
    /// Starts a line at quantity 1. Pass-through product fields named like
    /// the line's own keys are dropped.
    pub fn new(mut product: Product) -> Self {
        product.extra.retain(|key, _| !LINE_KEYS.contains(&key.as_str()));
        Self {
            product,
            quantity: 1,
        }
    }

    pub fn subtotal(&self) -> f64 {
        self.product.selling_price * f64::from(self.quantity)
    }
}

/// Input for changing a line's quantity. Values below 1 remove the line.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityInput {
    pub quantity: i64,
}

/// A line item as rendered for the cart drawer
#[derive(Debug, Serialize)]
pub struct CartLineView {
    #[serde(flatten)]
    pub item: CartLineItem,

    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

/// Response for every cart operation
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    /// Cart (session) identifier
    pub cart_id: String,

    pub items: Vec<CartLineView>,

    pub item_count: u64,

    pub total: f64,
}
