//! HTTP client for the Shoplive private API.

use std::time::Duration;

use chrono::Utc;
use onair_core::retry::retry_with_backoff;
use onair_core::{CampaignStatus, StockStatus};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;

use crate::auth::TokenSigner;
use crate::error::ShopliveError;
use crate::types::{
    CampaignListResponse, CampaignMeta, ProductListResponse, ProductRow, StockStatusUpdate,
};

const DEFAULT_BASE_URL: &str = "https://private.shopliveapi.com/v2";

/// Upper bound on campaign listing pages for one status.
pub(crate) const MAX_PAGES: u32 = 100;

/// Client for campaign listing, product listing and stock-status updates.
///
/// Every request is scoped by the access key (`{base}/{accessKey}/...`) and
/// carries a freshly signed token in the `Authorization` header.
pub struct ShopliveClient {
    client: Client,
    signer: TokenSigner,
    base_url: Url,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl ShopliveClient {
    /// Creates a client pointed at the production API.
    ///
    /// # Errors
    ///
    /// See [`Self::with_base_url`].
    pub fn new(
        access_key: &str,
        secret_key_b64: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ShopliveError> {
        Self::with_base_url(
            DEFAULT_BASE_URL,
            access_key,
            secret_key_b64,
            timeout_secs,
            user_agent,
            max_retries,
            backoff_base_secs,
        )
    }

    /// Creates a client with a custom base URL.
    ///
    /// # Errors
    ///
    /// - [`ShopliveError::Http`] if the `reqwest::Client` cannot be constructed.
    /// - [`ShopliveError::Token`] if the secret key is not valid base64.
    /// - [`ShopliveError::InvalidBaseUrl`] if `base_url` is not an absolute
    ///   hierarchical URL.
    pub fn with_base_url(
        base_url: &str,
        access_key: &str,
        secret_key_b64: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ShopliveError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let parsed = Url::parse(base_url).map_err(|e| ShopliveError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ShopliveError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: "URL cannot carry path segments".to_owned(),
            });
        }

        Ok(Self {
            client,
            signer: TokenSigner::new(access_key, secret_key_b64)?,
            base_url: parsed,
            max_retries,
            backoff_base_secs,
        })
    }

    /// Fetches one page of campaigns in `status`. Pages are 1-based.
    ///
    /// # Errors
    ///
    /// Returns [`ShopliveError`] on transport failure, non-2xx status or an
    /// unparseable body.
    pub async fn list_campaigns(
        &self,
        status: CampaignStatus,
        page: u32,
        count: u32,
    ) -> Result<CampaignListResponse, ShopliveError> {
        let mut url = self.endpoint(&["campaign"]);
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("count", &count.to_string())
            .append_pair("campaignStatus", status.as_str());

        let context = format!("{status} campaigns page {page}");
        self.get_json(url, &context).await
    }

    /// Fetches every campaign in `status`, following pagination.
    ///
    /// Stops on a short page or once `totalCount` entries have been seen.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::list_campaigns`]; returns
    /// [`ShopliveError::PaginationLimit`] past [`MAX_PAGES`] pages.
    pub async fn list_all_campaigns(
        &self,
        status: CampaignStatus,
        page_size: u32,
    ) -> Result<Vec<CampaignMeta>, ShopliveError> {
        let page_size = page_size.max(1);
        let mut campaigns: Vec<CampaignMeta> = Vec::new();
        let mut page = 0u32;

        loop {
            page += 1;
            if page > MAX_PAGES {
                return Err(ShopliveError::PaginationLimit {
                    status: status.to_string(),
                    max_pages: MAX_PAGES,
                });
            }

            let response = self.list_campaigns(status, page, page_size).await?;
            let fetched = response.results.len();
            campaigns.extend(response.results.into_iter().map(|entry| entry.campaign_meta));

            tracing::debug!(%status, page, fetched, total = campaigns.len(), "campaign page fetched");

            if fetched < page_size as usize {
                break;
            }
            if let Some(total) = response.total_count {
                if campaigns.len() as u64 >= total {
                    break;
                }
            }
        }

        Ok(campaigns)
    }

    /// Lists the products attached to a campaign, one [`ProductRow`] per
    /// listed row.
    ///
    /// # Errors
    ///
    /// Returns [`ShopliveError`] on transport failure, non-2xx status or a
    /// body that is neither a product array nor a `results` envelope. A
    /// single malformed row is reported in its own [`ProductRow`] instead.
    pub async fn list_campaign_products(
        &self,
        campaign_key: &str,
    ) -> Result<Vec<ProductRow>, ShopliveError> {
        let url = self.endpoint(&["console", campaign_key, "product"]);
        let context = format!("products of campaign {campaign_key}");
        let response: ProductListResponse = self.get_json(url, &context).await?;
        Ok(response.into_rows())
    }

    /// Sets `stock_status` on every product in `product_ids` in one call.
    ///
    /// # Errors
    ///
    /// Returns [`ShopliveError`] on transport failure or non-2xx status.
    pub async fn update_stock_status(
        &self,
        campaign_key: &str,
        product_ids: &[i64],
        stock_status: StockStatus,
    ) -> Result<(), ShopliveError> {
        let url = self.endpoint(&["console", campaign_key, "product", "stockStatus"]);
        let body = StockStatusUpdate {
            product_ids,
            stock_status,
        };

        retry_with_backoff(
            self.max_retries,
            self.backoff_base_secs,
            ShopliveError::is_retriable,
            || {
                let url = url.clone();
                let body = &body;
                async move {
                    let request = self.authorized(Method::PUT, url.clone())?.json(body);
                    let response = request.send().await?;
                    check_status(response, &url).await.map(|_| ())
                }
            },
        )
        .await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        context: &str,
    ) -> Result<T, ShopliveError> {
        retry_with_backoff(
            self.max_retries,
            self.backoff_base_secs,
            ShopliveError::is_retriable,
            || {
                let url = url.clone();
                async move {
                    let response = self.authorized(Method::GET, url.clone())?.send().await?;
                    let response = check_status(response, &url).await?;
                    let body = response.text().await?;
                    serde_json::from_str::<T>(&body).map_err(|e| ShopliveError::Deserialize {
                        context: context.to_owned(),
                        source: e,
                    })
                }
            },
        )
        .await
    }

    fn authorized(&self, method: Method, url: Url) -> Result<RequestBuilder, ShopliveError> {
        let token = self.signer.sign(Utc::now())?;
        Ok(self
            .client
            .request(method, url)
            .header(reqwest::header::AUTHORIZATION, token)
            .header(reqwest::header::ACCEPT, "application/json"))
    }

    /// Builds `{base}/{accessKey}/{segments...}`.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty()
                .push(self.signer.access_key())
                .extend(segments);
        }
        url
    }
}

async fn check_status(response: Response, url: &Url) -> Result<Response, ShopliveError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    tracing::debug!(status = status.as_u16(), %url, body = %truncate(&body, 300), "Shoplive error response");
    Err(ShopliveError::UnexpectedStatus {
        status: status.as_u16(),
        url: url.to_string(),
    })
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
