//! Storefront Library
//!
//! This library provides a product catalog proxy over an upstream commerce
//! API, a session-scoped shopping cart, and a paginated listing accumulator
//! for infinite-scroll consumers.

// Domain modules
pub mod cart;
pub mod catalog;
pub mod listing;

// Infrastructure
pub mod config;
pub mod error;
pub mod router;
pub mod state;
