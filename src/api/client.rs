//! HTTP client for the ordering API
//!
//! This module handles all HTTP requests made by kcouper, including:
//! - Building a client with the fixed browser identity and a cookie store
//! - POSTing JSON bodies to named endpoints
//! - Retrying HTTP 502 with a fixed delay
//! - Classifying every other failure

use crate::api::envelope::ApiResponse;
use crate::api::ApiError;
use crate::config::{ApiConfig, RetryConfig};
use reqwest::header::{HeaderMap, HeaderValue, ORIGIN, REFERER};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;
use url::Url;

/// Client bound to one API host, reused serially for a whole run
///
/// The remote system keys its session on cookies set during bootstrap, so the
/// same `ApiClient` must be used for the bootstrap and every later call.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    retry: RetryConfig,
}

/// Builds an HTTP client presenting the configured browser identity
///
/// # Example
///
/// ```no_run
/// use kcouper::api::build_http_client;
/// use kcouper::config::ApiConfig;
///
/// let client = build_http_client(&ApiConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &ApiConfig) -> Result<Client, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(ORIGIN, header_value(&config.origin)?);
    headers.insert(REFERER, header_value(&config.referer)?);

    let client = Client::builder()
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .cookie_store(true)
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()?;
    Ok(client)
}

fn header_value(value: &str) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(value).map_err(|_| ApiError::InvalidHeader(value.to_string()))
}

impl ApiClient {
    /// Creates a client for `config.base_url`
    pub fn new(config: &ApiConfig, retry: RetryConfig) -> Result<Self, ApiError> {
        let mut base_url = Url::parse(&config.base_url)?;
        // Url::join drops the last path segment unless it ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            client: build_http_client(config)?,
            base_url,
            retry,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// POSTs `body` as JSON to `endpoint` and decodes the response envelope
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | HTTP 502 | Sleep `retry.delay`, retry up to `retry.max_retries` times |
    /// | HTTP 502 after the last retry | `RetryExhausted` |
    /// | Other non-200 status | `Transport`, no retry |
    /// | Connection failure | `Network`, no retry |
    /// | HTTP 200, body not an envelope | `Decode` |
    ///
    /// `label` describes the call in log lines and errors.
    pub async fn call<B>(
        &self,
        label: &str,
        endpoint: &str,
        body: &B,
    ) -> Result<ApiResponse, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.base_url.join(endpoint)?;
        let mut retries = 0u32;

        loop {
            let response = self
                .client
                .post(url.clone())
                .json(body)
                .send()
                .await
                .map_err(|source| ApiError::Network {
                    label: label.to_string(),
                    source,
                })?;

            let status = response.status();
            if status == StatusCode::BAD_GATEWAY {
                if retries >= self.retry.max_retries {
                    tracing::error!(
                        "{} 502 error, giving up after {} attempts",
                        label,
                        retries + 1
                    );
                    return Err(ApiError::RetryExhausted {
                        label: label.to_string(),
                        attempts: retries + 1,
                    });
                }
                retries += 1;
                tracing::warn!("{} 502 error, retry={}", label, retries);
                tokio::time::sleep(self.retry.delay()).await;
                continue;
            }

            let text = response.text().await.map_err(|source| ApiError::Network {
                label: label.to_string(),
                source,
            })?;

            if status != StatusCode::OK {
                tracing::error!(
                    "{} error, status code: {}, text: {}",
                    label,
                    status.as_u16(),
                    text
                );
                return Err(ApiError::Transport {
                    label: label.to_string(),
                    status: status.as_u16(),
                    body: text,
                });
            }

            return serde_json::from_str(&text).map_err(|source| {
                tracing::error!("{} returned an undecodable body: {}", label, source);
                ApiError::Decode {
                    label: label.to_string(),
                    source,
                }
            });
        }
    }
}
