//! Shoplive private API request/response types.
//!
//! ### Campaign listing
//! `{"results": [{"campaignMeta": {...}, "stream": {...}}], "totalCount": N}`.
//! Only `campaignMeta` is modelled. `scheduledStartAt` / `scheduledEndAt`
//! are ISO-8601 strings, usually with a `Z` suffix, and may be `null`.
//!
//! ### Campaign products
//! Observed both as `{"results": [...]}` and as a bare array; see
//! [`ProductListResponse`]. Rows are decoded one at a time so a single bad
//! row does not discard the others.
//!
//! ### `productId`
//! Numeric, but some responses render it as a numeric string. Both are
//! accepted.

use chrono::{DateTime, Utc};
use onair_core::{parse_timestamp, Campaign, CampaignStatus, StockStatus, TimestampError};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::MalformedProduct;

/// Response from `GET {base}/{accessKey}/campaign`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignListResponse {
    pub results: Vec<CampaignEntry>,
    #[serde(default)]
    pub total_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignEntry {
    pub campaign_meta: CampaignMeta,
}

/// Campaign metadata as returned by the listing endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignMeta {
    pub campaign_id: i64,
    pub campaign_key: String,
    #[serde(default)]
    pub title: Option<String>,
    pub campaign_status: CampaignStatus,
    #[serde(default)]
    pub scheduled_start_at: Option<String>,
    #[serde(default)]
    pub scheduled_end_at: Option<String>,
}

impl CampaignMeta {
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    /// Parsed scheduled start, or `None` when the campaign has none.
    ///
    /// # Errors
    ///
    /// Returns [`TimestampError`] if a present start does not parse.
    pub fn scheduled_start(&self) -> Result<Option<DateTime<Utc>>, TimestampError> {
        parse_optional(self.scheduled_start_at.as_deref())
    }

    /// Converts to a schedule entry. Campaigns without a start time yield
    /// `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`TimestampError`] if either timestamp is present but invalid.
    pub fn to_campaign(&self) -> Result<Option<Campaign>, TimestampError> {
        let Some(start) = self.scheduled_start()? else {
            return Ok(None);
        };
        let end = parse_optional(self.scheduled_end_at.as_deref())?;
        Ok(Some(Campaign {
            campaign_id: self.campaign_id,
            campaign_key: self.campaign_key.clone(),
            title: self.display_title().to_owned(),
            status: self.campaign_status,
            scheduled_start_at: start,
            scheduled_end_at: end,
        }))
    }
}

fn parse_optional(raw: Option<&str>) -> Result<Option<DateTime<Utc>>, TimestampError> {
    match raw {
        Some(value) if !value.trim().is_empty() => parse_timestamp(value).map(Some),
        _ => Ok(None),
    }
}

/// A product attached to a campaign.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignProduct {
    #[serde(deserialize_with = "deserialize_product_id")]
    pub product_id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl CampaignProduct {
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

/// Response from `GET {base}/{accessKey}/console/{campaignKey}/product`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ProductListResponse {
    Envelope { results: Vec<serde_json::Value> },
    Bare(Vec<serde_json::Value>),
}

/// A decoded product, or the reason its row was unusable.
pub type ProductRow = Result<CampaignProduct, MalformedProduct>;

impl ProductListResponse {
    /// Decodes every row independently, preserving listing order.
    #[must_use]
    pub fn into_rows(self) -> Vec<ProductRow> {
        let (ProductListResponse::Envelope { results } | ProductListResponse::Bare(results)) =
            self;
        results
            .into_iter()
            .enumerate()
            .map(|(index, row)| {
                serde_json::from_value::<CampaignProduct>(row)
                    .map_err(|source| MalformedProduct { index, source })
            })
            .collect()
    }
}

/// Body for `PUT {base}/{accessKey}/console/{campaignKey}/product/stockStatus`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockStatusUpdate<'a> {
    pub product_ids: &'a [i64],
    pub stock_status: StockStatus,
}

fn deserialize_product_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdRepr {
        Number(i64),
        Text(String),
    }

    match IdRepr::deserialize(deserializer)? {
        IdRepr::Number(n) => Ok(n),
        IdRepr::Text(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|e| serde::de::Error::custom(format!("invalid productId \"{s}\": {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn meta(start: Option<&str>, end: Option<&str>) -> CampaignMeta {
        serde_json::from_value(json!({
            "campaignId": 42,
            "campaignKey": "live-42",
            "title": "Evening show",
            "campaignStatus": "READY",
            "scheduledStartAt": start,
            "scheduledEndAt": end
        }))
        .unwrap()
    }

    #[test]
    fn campaign_listing_parses_meta() {
        let body = json!({
            "results": [
                { "campaignMeta": {
                    "campaignId": 1, "campaignKey": "k1", "title": "A",
                    "campaignStatus": "ONAIR",
                    "scheduledStartAt": "2024-06-01T09:00:00Z",
                    "scheduledEndAt": null
                  },
                  "stream": { "url": "ignored" } }
            ],
            "totalCount": 1
        });
        let parsed: CampaignListResponse = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.total_count, Some(1));
        assert_eq!(parsed.results[0].campaign_meta.campaign_status, CampaignStatus::OnAir);
    }

    #[test]
    fn to_campaign_parses_timestamps() {
        let campaign = meta(Some("2024-06-01T09:00:00Z"), Some("2024-06-01T10:30:00Z"))
            .to_campaign()
            .unwrap()
            .unwrap();
        assert_eq!(
            campaign.scheduled_start_at,
            Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()
        );
        assert_eq!(
            campaign.scheduled_end_at,
            Some(Utc.with_ymd_and_hms(2024, 6, 1, 10, 30, 0).unwrap())
        );
        assert_eq!(campaign.title, "Evening show");
    }

    #[test]
    fn to_campaign_without_start_is_none() {
        assert!(meta(None, None).to_campaign().unwrap().is_none());
        assert!(meta(Some(""), None).to_campaign().unwrap().is_none());
    }

    #[test]
    fn to_campaign_rejects_bad_timestamp() {
        assert!(meta(Some("2024-06-01 09:00"), None).to_campaign().is_err());
    }

    #[test]
    fn product_list_accepts_envelope_and_bare_array() {
        let envelope: ProductListResponse = serde_json::from_value(json!({
            "results": [{ "productId": 10, "name": "A", "url": "https://qvc.jp/product.1.html" }]
        }))
        .unwrap();
        let bare: ProductListResponse =
            serde_json::from_value(json!([{ "productId": "11", "name": "B" }])).unwrap();

        assert_eq!(envelope.into_rows()[0].as_ref().unwrap().product_id, 10);
        let bare = bare.into_rows();
        let first = bare[0].as_ref().unwrap();
        assert_eq!(first.product_id, 11);
        assert!(first.url.is_none());
    }

    #[test]
    fn bad_rows_do_not_hide_good_ones() {
        let listing: ProductListResponse = serde_json::from_value(json!({ "results": [
            { "productId": null, "name": "Broken" },
            { "productId": 10, "name": "Knit" },
            { "name": "No id" },
            { "productId": "12x" }
        ]}))
        .unwrap();

        let rows = listing.into_rows();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[1].as_ref().unwrap().product_id, 10);
        let bad: Vec<usize> = rows
            .iter()
            .filter_map(|row| row.as_ref().err().map(|e| e.index))
            .collect();
        assert_eq!(bad, vec![0, 2, 3]);
    }

    #[test]
    fn product_id_rejects_non_numeric_text() {
        let result = serde_json::from_value::<CampaignProduct>(json!({ "productId": "abc" }));
        assert!(result.is_err());
    }

    #[test]
    fn stock_status_update_body_shape() {
        let body = StockStatusUpdate {
            product_ids: &[1, 2],
            stock_status: StockStatus::SoldOut,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "productIds": [1, 2], "stockStatus": "SOLD_OUT" })
        );
    }
}
