//! Broadcast campaigns and the persisted schedule document.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a live broadcast campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CampaignStatus {
    #[serde(rename = "READY")]
    Ready,
    #[serde(rename = "ONAIR")]
    OnAir,
    #[serde(rename = "ENDED")]
    Ended,
}

impl CampaignStatus {
    /// Wire value used by the live-commerce API (`campaignStatus` query parameter).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            CampaignStatus::Ready => "READY",
            CampaignStatus::OnAir => "ONAIR",
            CampaignStatus::Ended => "ENDED",
        }
    }
}

impl std::fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scheduled campaign as stored in the schedule document.
///
/// Only campaigns with a known start time are represented here; the
/// end time is optional and falls back to the configured default duration
/// when windows are computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub campaign_id: i64,
    pub campaign_key: String,
    pub title: String,
    pub status: CampaignStatus,
    #[serde(with = "crate::timestamp::utc")]
    pub scheduled_start_at: DateTime<Utc>,
    #[serde(default, with = "crate::timestamp::utc_option")]
    pub scheduled_end_at: Option<DateTime<Utc>>,
}

/// The persisted schedule: last refresh time plus campaigns sorted by start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDocument {
    pub updated_at: DateTime<FixedOffset>,
    pub campaigns: Vec<Campaign>,
}

impl ScheduleDocument {
    /// Builds a document stamped at `refreshed_at`, sorting campaigns by
    /// start time ascending. The sort is stable, so campaigns sharing a
    /// start time keep their fetch order.
    #[must_use]
    pub fn new(refreshed_at: DateTime<Utc>, mut campaigns: Vec<Campaign>) -> Self {
        campaigns.sort_by_key(|c| c.scheduled_start_at);
        Self {
            updated_at: crate::timestamp::to_display(refreshed_at),
            campaigns,
        }
    }
}
