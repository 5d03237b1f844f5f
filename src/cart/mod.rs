//! Shopping Cart Domain Module
//!
//! This module contains all shopping cart business logic, including:
//! - Domain models (line items, inputs, summaries)
//! - The cart state container and its derived totals
//! - Per-session cart storage
//! - REST API handlers

pub mod handlers;
pub mod helpers;
pub mod models;
pub mod state;
pub mod store;

// Re-export commonly used types for convenience
pub use handlers::routes;
pub use state::CartSessions;
pub use store::CartStore;
