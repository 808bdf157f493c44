//! HTTP client for QVC Japan's product presentation API.

use std::time::Duration;

use onair_core::retry::retry_with_backoff;
use onair_core::StockResult;
use reqwest::{Client, Url};

use crate::error::QvcError;
use crate::types::QvcProductResponse;

const DEFAULT_BASE_URL: &str = "https://qvc.jp/api/sales/presentation/v3/jp/products";

/// Client for single-product stock lookups.
///
/// 404 and other non-2xx responses surface as typed errors. Transient
/// failures (network errors, 429, 5xx) are retried with exponential backoff
/// up to `max_retries` additional attempts.
pub struct QvcClient {
    client: Client,
    base_url: Url,
    /// Maximum number of retry attempts after the first failure.
    max_retries: u32,
    /// Base delay in seconds for exponential backoff.
    backoff_base_secs: u64,
}

impl QvcClient {
    /// Creates a client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`QvcError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, QvcError> {
        Self::with_base_url(
            DEFAULT_BASE_URL,
            timeout_secs,
            user_agent,
            max_retries,
            backoff_base_secs,
        )
    }

    /// Creates a client with a custom base URL (configuration override or
    /// a mock server in tests).
    ///
    /// # Errors
    ///
    /// - [`QvcError::Http`] if the `reqwest::Client` cannot be constructed.
    /// - [`QvcError::InvalidBaseUrl`] if `base_url` is not an absolute
    ///   hierarchical URL.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, QvcError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let parsed = Url::parse(base_url).map_err(|e| QvcError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(QvcError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: "URL cannot carry path segments".to_owned(),
            });
        }

        Ok(Self {
            client,
            base_url: parsed,
            max_retries,
            backoff_base_secs,
        })
    }

    /// Fetches the full stock picture for one product and aggregates it.
    ///
    /// # Errors
    ///
    /// - [`QvcError::NotFound`]: HTTP 404 (not retried).
    /// - [`QvcError::UnexpectedStatus`]: any other non-2xx status after retries.
    /// - [`QvcError::Http`]: network or TLS failure after retries.
    /// - [`QvcError::Deserialize`]: body does not match the expected shape.
    pub async fn get_stock(&self, product_id: &str) -> Result<StockResult, QvcError> {
        let url = self.product_url(product_id);
        let response = retry_with_backoff(
            self.max_retries,
            self.backoff_base_secs,
            QvcError::is_retriable,
            || {
                let url = url.clone();
                async move { self.request_product(url, product_id).await }
            },
        )
        .await?;

        Ok(response.into_stock_result(product_id))
    }

    async fn request_product(
        &self,
        url: Url,
        product_id: &str,
    ) -> Result<QvcProductResponse, QvcError> {
        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(QvcError::NotFound {
                url: url.to_string(),
            });
        }

        if !status.is_success() {
            return Err(QvcError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str::<QvcProductResponse>(&body).map_err(|e| QvcError::Deserialize {
            context: format!("product {product_id}"),
            source: e,
        })
    }

    /// Builds `{base}/{product_id}?response-depth=full`.
    fn product_url(&self, product_id: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(product_id);
        }
        url.query_pairs_mut()
            .clear()
            .append_pair("response-depth", "full");
        url
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
