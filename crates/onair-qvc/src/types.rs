//! QVC product presentation API response types.
//!
//! Only the fields used for stock checks are modelled. `productName`,
//! `colours`, and each colour's `sizes` must be present; a body missing any
//! of them is a deserialization error rather than an empty product. Colour
//! and size labels may be `null` and are rendered as empty strings.
//!
//! ### `ats`
//! "Available to sell" code per size: `Y`, `L` (low), or `N`. Absent or
//! unrecognised codes are read as `N`.

use onair_core::{AvailabilityCode, StockResult, Variant};
use serde::Deserialize;

/// Top-level response from `GET {base}/{product_id}?response-depth=full`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QvcProductResponse {
    pub product_name: String,
    pub colours: Vec<QvcColour>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QvcColour {
    #[serde(default)]
    pub colour_name: Option<String>,
    pub sizes: Vec<QvcSize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QvcSize {
    #[serde(default)]
    pub size_name: Option<String>,
    #[serde(default)]
    pub ats: Option<String>,
}

impl QvcProductResponse {
    /// Flattens colours × sizes into variants, preserving response order,
    /// and aggregates them into a [`StockResult`].
    #[must_use]
    pub fn into_stock_result(self, product_id: &str) -> StockResult {
        let mut variants = Vec::new();
        for colour in self.colours {
            let color = colour.colour_name.unwrap_or_default();
            for size in colour.sizes {
                let ats = AvailabilityCode::from_code(size.ats.as_deref());
                if ats == AvailabilityCode::Unavailable
                    && !matches!(size.ats.as_deref().map(str::trim), Some("N"))
                {
                    tracing::debug!(
                        product_id,
                        raw_ats = ?size.ats,
                        "unrecognised ATS code, treating as unavailable"
                    );
                }
                variants.push(Variant {
                    color: color.clone(),
                    size: size.size_name.unwrap_or_default(),
                    ats,
                });
            }
        }
        StockResult::new(self.product_name, product_id.to_owned(), variants)
    }
}
