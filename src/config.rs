//! Service configuration loaded from the environment.

use std::{env, fmt::Display, net::SocketAddr, str::FromStr, time::Duration};

use tracing::{info, warn};

use crate::error::AppError;

pub struct Config {
    pub bind_address: SocketAddr,
    /// Upstream commerce API base, without trailing slash.
    pub api_base_url: String,
    /// Prefix for product image paths, without trailing slash.
    pub cdn_base_url: String,
    pub fallback_image: String,
    pub request_timeout: Duration,
    pub default_per_page: u32,
    pub max_per_page: u32,
    /// Allow synthesizing `total`/`last_page` when the upstream omits them.
    pub estimate_missing_totals: bool,
    /// Carts untouched for this long are dropped.
    pub cart_idle_timeout: Duration,
    pub max_cart_sessions: usize,
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            bind_address: try_load(&lookup, "STOREFRONT_BIND", "0.0.0.0:8000")?,
            api_base_url: trim_base(required(&lookup, "API_BASE_URL")?),
            cdn_base_url: trim_base(required(&lookup, "CDN_BASE_URL")?),
            fallback_image: required(&lookup, "FALLBACK_IMAGE")?,
            request_timeout: Duration::from_secs(try_load(&lookup, "REQUEST_TIMEOUT_SECS", "10")?),
            default_per_page: try_load(&lookup, "DEFAULT_PER_PAGE", "15")?,
            max_per_page: try_load(&lookup, "MAX_PER_PAGE", "100")?,
            estimate_missing_totals: try_load(&lookup, "ESTIMATE_MISSING_TOTALS", "false")?,
            cart_idle_timeout: Duration::from_secs(try_load(&lookup, "CART_IDLE_TIMEOUT_SECS", "1800")?),
            max_cart_sessions: try_load(&lookup, "MAX_CART_SESSIONS", "10000")?,
        };

        if config.default_per_page == 0 || config.default_per_page > config.max_per_page {
            return Err(AppError::Config(format!(
                "DEFAULT_PER_PAGE must be between 1 and {}",
                config.max_per_page
            )));
        }

        if config.cart_idle_timeout.is_zero() || config.max_cart_sessions == 0 {
            return Err(AppError::Config(
                "CART_IDLE_TIMEOUT_SECS and MAX_CART_SESSIONS must be positive".into(),
            ));
        }

        if config.estimate_missing_totals {
            warn!("ESTIMATE_MISSING_TOTALS enabled: listing totals may be approximate");
        }

        Ok(config)
    }
}

fn required<F>(lookup: &F, key: &str) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Config(format!("{key} must be set")))
}

fn try_load<F, T>(lookup: &F, key: &str, default: &str) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    lookup(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid {key} value: {e}")))
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
