//! Catalog Domain Module
//!
//! This module contains the product catalog proxy, including:
//! - Strict product and listing models
//! - Normalization and pagination helpers
//! - The upstream API client
//! - REST handlers for `/api/products...`

pub mod client;
pub mod handlers;
pub mod helpers;
pub mod models;

pub use client::UpstreamClient;
pub use handlers::routes;
