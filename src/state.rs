//! Application State
//!
//! Everything a handler needs, owned in one place and handed to the router.

use crate::{
    cart::CartSessions, catalog::UpstreamClient, config::Config, error::AppError,
};
use std::sync::Arc;

/// Shared application state that can be safely passed between threads
pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub upstream: UpstreamClient,
    pub carts: CartSessions,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, AppError> {
        let upstream = UpstreamClient::from_config(&config)?;
        let carts = CartSessions::new(config.cart_idle_timeout, config.max_cart_sessions);

        Ok(Self {
            config,
            upstream,
            carts,
        })
    }

    pub fn shared(config: Config) -> Result<SharedState, AppError> {
        Self::new(config).map(Arc::new)
    }
}
