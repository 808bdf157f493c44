//! Stock availability types and the product-level status aggregation.
//!
//! The retail inventory API reports availability per colour/size variant as
//! an ATS ("available to sell") code. A product's overall status is derived
//! from the multiset of its variant codes; see [`aggregate_status`].

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Per-variant availability as reported by the inventory API.
///
/// Wire codes: `Y` (available), `L` (low), `N` (unavailable). Anything else,
/// including a missing code, is read as [`AvailabilityCode::Unavailable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AvailabilityCode {
    Available,
    Low,
    Unavailable,
}

impl AvailabilityCode {
    /// Maps a raw ATS code to an availability value. Total over all inputs.
    #[must_use]
    pub fn from_code(code: Option<&str>) -> Self {
        match code.map(str::trim) {
            Some("Y") => AvailabilityCode::Available,
            Some("L") => AvailabilityCode::Low,
            _ => AvailabilityCode::Unavailable,
        }
    }

    #[must_use]
    pub const fn as_code(self) -> &'static str {
        match self {
            AvailabilityCode::Available => "Y",
            AvailabilityCode::Low => "L",
            AvailabilityCode::Unavailable => "N",
        }
    }
}

impl Serialize for AvailabilityCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_code())
    }
}

impl<'de> Deserialize<'de> for AvailabilityCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(AvailabilityCode::from_code(raw.as_deref()))
    }
}

/// Aggregated product-level stock status.
///
/// Ordering follows the order in which status groups are pushed upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockStatus {
    InStock,
    LowInStock,
    SoldOut,
}

impl StockStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            StockStatus::InStock => "IN_STOCK",
            StockStatus::LowInStock => "LOW_IN_STOCK",
            StockStatus::SoldOut => "SOLD_OUT",
        }
    }
}

impl std::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reduces variant availability codes to one product-level status.
///
/// Precedence:
/// 1. no codes → [`StockStatus::SoldOut`]
/// 2. every code unavailable → [`StockStatus::SoldOut`]
/// 3. any code low → [`StockStatus::LowInStock`]
/// 4. otherwise → [`StockStatus::InStock`]
///
/// The result depends only on which codes are present, never on their order.
#[must_use]
pub fn aggregate_status<I>(codes: I) -> StockStatus
where
    I: IntoIterator<Item = AvailabilityCode>,
{
    let mut any_low = false;
    let mut any_available = false;

    for code in codes {
        match code {
            AvailabilityCode::Low => any_low = true,
            AvailabilityCode::Available => any_available = true,
            AvailabilityCode::Unavailable => {}
        }
    }

    if any_low {
        StockStatus::LowInStock
    } else if any_available {
        StockStatus::InStock
    } else {
        StockStatus::SoldOut
    }
}

/// One colour/size combination of a retail product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub color: String,
    pub size: String,
    pub ats: AvailabilityCode,
}

/// Stock picture for a single retail product in one poll cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockResult {
    pub name: String,
    /// Identifier in the retail inventory system.
    pub product_id: String,
    pub variants: Vec<Variant>,
    pub overall_status: StockStatus,
}

impl StockResult {
    /// Builds a result, deriving `overall_status` from the variants.
    #[must_use]
    pub fn new(name: String, product_id: String, variants: Vec<Variant>) -> Self {
        let overall_status = aggregate_status(variants.iter().map(|v| v.ats));
        Self {
            name,
            product_id,
            variants,
            overall_status,
        }
    }
}

/// Display-overlay document, rewritten after each processed campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotDocument {
    pub updated_at: DateTime<FixedOffset>,
    pub campaign: String,
    pub products: Vec<StockResult>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use AvailabilityCode::{Available, Low, Unavailable};

    #[test]
    fn empty_is_sold_out() {
        assert_eq!(
            aggregate_status(Vec::<AvailabilityCode>::new()),
            StockStatus::SoldOut
        );
    }

    #[test]
    fn all_unavailable_is_sold_out() {
        assert_eq!(aggregate_status([Unavailable]), StockStatus::SoldOut);
        assert_eq!(
            aggregate_status([Unavailable, Unavailable, Unavailable]),
            StockStatus::SoldOut
        );
    }

    #[test]
    fn any_low_wins_over_available() {
        assert_eq!(aggregate_status([Available, Low]), StockStatus::LowInStock);
        assert_eq!(
            aggregate_status([Unavailable, Low, Unavailable]),
            StockStatus::LowInStock
        );
        assert_eq!(aggregate_status([Low]), StockStatus::LowInStock);
    }

    #[test]
    fn available_without_low_is_in_stock() {
        assert_eq!(aggregate_status([Available]), StockStatus::InStock);
        assert_eq!(
            aggregate_status([Unavailable, Available, Unavailable]),
            StockStatus::InStock
        );
    }

    #[test]
    fn result_does_not_depend_on_order() {
        let codes = [Available, Unavailable, Low, Available];
        let expected = aggregate_status(codes);
        // Every rotation of the sequence yields the same status.
        for shift in 0..codes.len() {
            let mut rotated = codes;
            rotated.rotate_left(shift);
            assert_eq!(aggregate_status(rotated), expected);
        }
        let mut reversed = codes;
        reversed.reverse();
        assert_eq!(aggregate_status(reversed), expected);
    }

    #[test]
    fn unknown_codes_are_unavailable() {
        assert_eq!(AvailabilityCode::from_code(Some("X")), Unavailable);
        assert_eq!(AvailabilityCode::from_code(Some("")), Unavailable);
        assert_eq!(AvailabilityCode::from_code(Some("y")), Unavailable);
        assert_eq!(AvailabilityCode::from_code(None), Unavailable);
        assert_eq!(AvailabilityCode::from_code(Some(" L ")), Low);
    }

    #[test]
    fn unknown_codes_aggregate_as_sold_out() {
        let codes = ["?", "maybe"].map(|c| AvailabilityCode::from_code(Some(c)));
        assert_eq!(aggregate_status(codes), StockStatus::SoldOut);
    }

    #[test]
    fn availability_code_deserializes_totally() {
        let parsed: Vec<AvailabilityCode> =
            serde_json::from_str(r#"["Y", "L", "N", "Q", null]"#).unwrap();
        assert_eq!(parsed, vec![Available, Low, Unavailable, Unavailable, Unavailable]);
    }

    #[test]
    fn stock_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&StockStatus::LowInStock).unwrap(),
            "\"LOW_IN_STOCK\""
        );
        assert_eq!(StockStatus::SoldOut.to_string(), "SOLD_OUT");
    }

    #[test]
    fn stock_result_serializes_overlay_shape() {
        let result = StockResult::new(
            "Cashmere knit".to_owned(),
            "748849".to_owned(),
            vec![Variant {
                color: "Navy".to_owned(),
                size: "M".to_owned(),
                ats: Low,
            }],
        );
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["product_id"], "748849");
        assert_eq!(value["overall_status"], "LOW_IN_STOCK");
        assert_eq!(value["variants"][0]["ats"], "L");
    }
}
