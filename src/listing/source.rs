//! Page sources feeding the listing accumulator.

use crate::catalog::{
    client::UpstreamClient,
    models::{ListingPage, ListingScope, PageRequest},
};
use crate::error::AppError;
use async_trait::async_trait;

/// Anything that can produce page `n` of one logical listing.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, page: u32) -> Result<ListingPage, AppError>;
}

/// A catalog listing (all products, one category, or one brand) read from
/// the upstream API with a fixed page size.
#[derive(Clone)]
pub struct ScopedListing {
    client: UpstreamClient,
    scope: ListingScope,
    per_page: u32,
}

impl ScopedListing {
    pub fn new(client: UpstreamClient, scope: ListingScope, per_page: u32) -> Self {
        Self {
            client,
            scope,
            per_page,
        }
    }

    pub fn scope(&self) -> ListingScope {
        self.scope
    }
}

#[async_trait]
impl PageSource for ScopedListing {
    async fn fetch_page(&self, page: u32) -> Result<ListingPage, AppError> {
        self.client
            .fetch_listing(
                self.scope,
                PageRequest {
                    page,
                    per_page: self.per_page,
                },
            )
            .await
    }
}
