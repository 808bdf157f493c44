//! Schedule refresh: list READY and ONAIR campaigns and persist them as the
//! schedule document the window checks read.

use anyhow::Context;
use chrono::{DateTime, Utc};
use onair_core::{save_document, to_display, AppConfig, Campaign, CampaignStatus, ScheduleDocument};
use onair_shoplive::ShopliveClient;

const REFRESH_STATUSES: [CampaignStatus; 2] = [CampaignStatus::Ready, CampaignStatus::OnAir];

/// Fetches upcoming and live campaigns and overwrites the schedule document.
///
/// A listing failure for one status is logged and the other status is still
/// persisted. If every status fails, the existing document is left untouched
/// and an error is returned.
///
/// # Errors
///
/// Returns an error if no status could be listed or the document cannot be
/// written.
pub(crate) async fn refresh_schedule(
    client: &ShopliveClient,
    config: &AppConfig,
    now: DateTime<Utc>,
) -> anyhow::Result<ScheduleDocument> {
    let mut campaigns: Vec<Campaign> = Vec::new();
    let mut failed_statuses = 0usize;

    for status in REFRESH_STATUSES {
        let metas = match client
            .list_all_campaigns(status, config.schedule_page_size)
            .await
        {
            Ok(metas) => metas,
            Err(e) => {
                tracing::error!(%status, error = %e, "failed to list campaigns");
                failed_statuses += 1;
                continue;
            }
        };

        for meta in metas {
            match meta.to_campaign() {
                Ok(Some(campaign)) => campaigns.push(campaign),
                Ok(None) => {
                    tracing::debug!(campaign_key = %meta.campaign_key, "campaign has no start time");
                }
                Err(e) => {
                    tracing::warn!(
                        campaign_key = %meta.campaign_key,
                        error = %e,
                        "dropping campaign with unparseable schedule"
                    );
                }
            }
        }
    }

    if failed_statuses == REFRESH_STATUSES.len() {
        anyhow::bail!("campaign listing failed for every status; schedule not updated");
    }

    let document = ScheduleDocument::new(now, campaigns);
    save_document(&config.schedule_path, &document).context("failed to write schedule")?;

    tracing::info!(
        count = document.campaigns.len(),
        path = %config.schedule_path.display(),
        "schedule saved"
    );
    for campaign in &document.campaigns {
        tracing::info!(
            start = %to_display(campaign.scheduled_start_at).format("%Y-%m-%d %H:%M"),
            title = %campaign.title,
            status = %campaign.status,
            "scheduled campaign (UTC+9)"
        );
    }

    Ok(document)
}

#[cfg(test)]
#[path = "schedule_test.rs"]
mod tests;
