//! Ordering API access
//!
//! This module contains everything that talks to the remote system:
//! - The JSON envelope every endpoint answers with
//! - A client with a fixed identity, a cookie store and a 502 retry loop
//! - The shop/time session bootstrap

mod client;
mod envelope;
mod session;

pub use client::{build_http_client, ApiClient};
pub use envelope::{ApiResponse, OK_MESSAGE};
pub use session::bootstrap;

use thiserror::Error;

/// Endpoint paths relative to the API base URL
pub mod endpoints {
    pub const QUERY_DELIVERY_SHOPS: &str = "menu/v1/QueryDeliveryShops";
    pub const QUERY_DELIVERY_TIME: &str = "menu/v1/QueryDeliveryTime";
    pub const GET_EVOUCHER: &str = "customer/v1/getEVoucherAPI";
    pub const CHECK_COUPON_PRODUCT: &str = "customer/v1/checkCouponProduct";
    pub const GET_FOOD_DETAIL: &str = "menu/v1/GetQueryFoodDetail";
    pub const GET_MENU: &str = "menu/v1/GetQueryMenu";
    pub const GET_FOOD: &str = "menu/v1/GetQueryFood";
}

/// Errors raised while calling the API
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{label} error, status code: {status}, text: {body}")]
    Transport {
        label: String,
        status: u16,
        body: String,
    },

    #[error("{label} still failing with 502 after {attempts} attempts")]
    RetryExhausted { label: String, attempts: u32 },

    #[error("{label} returned an undecodable body: {source}")]
    Decode {
        label: String,
        source: serde_json::Error,
    },

    #[error("{label} request failed: {source}")]
    Network {
        label: String,
        source: reqwest::Error,
    },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Invalid header value: {0:?}")]
    InvalidHeader(String),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// True for failures that only affect the call in flight
    pub fn is_candidate_local(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Network { .. })
    }
}
