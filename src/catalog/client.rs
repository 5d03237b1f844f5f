//! Upstream commerce API client.

use super::{
    helpers::normalize_listing,
    models::{ListingPage, ListingScope, PageRequest, Product, ProductId, RawListing},
};
use crate::{config::Config, error::AppError};
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};

/// Thin wrapper over `reqwest::Client` that knows the upstream paths and
/// normalizes every body into the strict catalog types.
#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: String,
    estimate_missing_totals: bool,
}

impl UpstreamClient {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        estimate_missing_totals: bool,
    ) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            estimate_missing_totals,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Self::new(
            config.api_base_url.clone(),
            config.request_timeout,
            config.estimate_missing_totals,
        )
    }

    /// `GET {base}/api/v1/products/{id}`
    pub async fn fetch_product(&self, id: ProductId) -> Result<Product, AppError> {
        let url = format!("{}/api/v1/products/{id}", self.base_url);
        self.get_json(&url, &[]).await
    }

    /// Fetches one listing page for `scope` and fills in missing pagination.
    pub async fn fetch_listing(
        &self,
        scope: ListingScope,
        request: PageRequest,
    ) -> Result<ListingPage, AppError> {
        let url = format!("{}{}", self.base_url, scope.upstream_path());
        let query = [
            ("page", request.page.to_string()),
            ("per_page", request.per_page.to_string()),
        ];

        let raw: RawListing = self.get_json(&url, &query).await?;
        let page = normalize_listing(raw, request, self.estimate_missing_totals)?;

        info!(
            ?scope,
            page = page.current_page,
            items = page.data.len(),
            total = page.total,
            last_page = page.last_page,
            per_page = page.per_page,
            "Fetched listing page"
        );

        Ok(page)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, AppError> {
        debug!("GET {url} {query:?}");

        let response = self
            .http
            .get(url)
            .query(query)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
