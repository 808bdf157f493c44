//! One stock check cycle: resolve target campaigns, check every product's
//! inventory, push grouped status updates and write the display snapshot.
//!
//! Per-product, per-group and per-snapshot failures are logged and counted
//! in the [`CycleReport`]; they never abort the cycle.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, TimeDelta, Utc};
use onair_core::{
    save_document, starts_within_lead, to_display, AppConfig, CampaignStatus, SnapshotDocument,
    StockResult, StockStatus,
};
use onair_qvc::{extract_product_id, QvcClient, QvcError};
use onair_shoplive::{CampaignMeta, CampaignProduct, MalformedProduct, ShopliveClient};

/// A campaign selected for this cycle.
#[derive(Debug)]
pub(crate) struct TargetCampaign {
    pub meta: CampaignMeta,
    /// READY campaign due to start within the lead time.
    pub starting_soon: bool,
}

/// Every ONAIR campaign in listing order, then every READY campaign whose
/// start is no later than `now + lead`.
pub(crate) fn select_target_campaigns(
    onair: Vec<CampaignMeta>,
    ready: Vec<CampaignMeta>,
    now: DateTime<Utc>,
    lead: TimeDelta,
) -> Vec<TargetCampaign> {
    let mut targets: Vec<TargetCampaign> = onair
        .into_iter()
        .map(|meta| TargetCampaign {
            meta,
            starting_soon: false,
        })
        .collect();

    for meta in ready {
        let start = match meta.scheduled_start() {
            Ok(Some(start)) => start,
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!(
                    campaign_key = %meta.campaign_key,
                    error = %e,
                    "skipping READY campaign with unparseable start"
                );
                continue;
            }
        };
        if starts_within_lead(start, now, lead) {
            targets.push(TargetCampaign {
                meta,
                starting_soon: true,
            });
        }
    }

    targets
}

async fn list_or_empty(
    client: &ShopliveClient,
    status: CampaignStatus,
    page_size: u32,
) -> Vec<CampaignMeta> {
    match client.list_all_campaigns(status, page_size).await {
        Ok(metas) => metas,
        Err(e) => {
            tracing::error!(%status, error = %e, "failed to list campaigns");
            Vec::new()
        }
    }
}

async fn fetch_target_campaigns(
    client: &ShopliveClient,
    config: &AppConfig,
    now: DateTime<Utc>,
) -> Vec<TargetCampaign> {
    let onair = list_or_empty(client, CampaignStatus::OnAir, config.schedule_page_size).await;
    let ready = list_or_empty(client, CampaignStatus::Ready, config.schedule_page_size).await;
    let lead = TimeDelta::minutes(i64::from(config.ready_lead_minutes));
    select_target_campaigns(onair, ready, now, lead)
}

#[derive(Debug)]
pub(crate) enum SkipReason {
    /// The product URL carries no recognisable QVC product id.
    IdentifierNotFound { url: String },
    /// The inventory lookup failed with a transport, status or parse error.
    Inventory(QvcError),
    /// The listing row itself could not be decoded.
    MalformedProduct(MalformedProduct),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::IdentifierNotFound { url } => write!(f, "no product id in \"{url}\""),
            SkipReason::Inventory(e) => write!(f, "inventory lookup failed: {e}"),
            SkipReason::MalformedProduct(e) => write!(f, "{e}"),
        }
    }
}

/// Result of checking one campaign product.
#[derive(Debug)]
pub(crate) enum ProductOutcome {
    Checked {
        platform_id: i64,
        result: StockResult,
    },
    Skipped {
        /// Absent when the row carried no usable id.
        platform_id: Option<i64>,
        reason: SkipReason,
    },
}

async fn check_product(qvc: &QvcClient, product: &CampaignProduct) -> ProductOutcome {
    let platform_id = product.product_id;
    let url = product.url.as_deref().unwrap_or("");

    let Some(qvc_id) = extract_product_id(url) else {
        tracing::warn!(
            product = product.display_name(),
            url,
            "no QVC product id in product URL"
        );
        return ProductOutcome::Skipped {
            platform_id: Some(platform_id),
            reason: SkipReason::IdentifierNotFound {
                url: url.to_owned(),
            },
        };
    };

    match qvc.get_stock(&qvc_id).await {
        Ok(result) => {
            tracing::info!(
                product = product.display_name(),
                qvc_id = %qvc_id,
                status = %result.overall_status,
                variants = result.variants.len(),
                "stock checked"
            );
            ProductOutcome::Checked {
                platform_id,
                result,
            }
        }
        Err(e) => {
            tracing::error!(
                product = product.display_name(),
                qvc_id = %qvc_id,
                error = %e,
                "inventory lookup failed"
            );
            ProductOutcome::Skipped {
                platform_id: Some(platform_id),
                reason: SkipReason::Inventory(e),
            }
        }
    }
}

/// Platform product ids per aggregated status, iterated in
/// IN_STOCK, LOW_IN_STOCK, SOLD_OUT order. Empty groups are absent.
pub(crate) fn group_by_status(outcomes: &[ProductOutcome]) -> BTreeMap<StockStatus, Vec<i64>> {
    let mut groups: BTreeMap<StockStatus, Vec<i64>> = BTreeMap::new();
    for outcome in outcomes {
        if let ProductOutcome::Checked {
            platform_id,
            result,
        } = outcome
        {
            groups
                .entry(result.overall_status)
                .or_default()
                .push(*platform_id);
        }
    }
    groups
}

/// Counters for one cycle, logged when it ends.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct CycleReport {
    pub campaigns: usize,
    pub campaigns_failed: usize,
    pub checked: usize,
    pub skipped: usize,
    pub groups_updated: usize,
    pub groups_failed: usize,
    pub snapshots_written: usize,
    pub snapshots_failed: usize,
}

impl CycleReport {
    fn log(&self) {
        tracing::info!(
            campaigns = self.campaigns,
            campaigns_failed = self.campaigns_failed,
            checked = self.checked,
            skipped = self.skipped,
            groups_updated = self.groups_updated,
            groups_failed = self.groups_failed,
            snapshots_written = self.snapshots_written,
            snapshots_failed = self.snapshots_failed,
            "stock check cycle complete"
        );
    }

    /// Fails when any snapshot document could not be written this cycle.
    pub(crate) fn ensure_snapshots_written(&self) -> anyhow::Result<()> {
        if self.snapshots_failed > 0 {
            anyhow::bail!(
                "{} of {} stock snapshot writes failed",
                self.snapshots_failed,
                self.snapshots_failed + self.snapshots_written
            );
        }
        Ok(())
    }
}

/// Runs one full check over every target campaign at instant `now`.
pub(crate) async fn run_cycle(
    shoplive: &ShopliveClient,
    qvc: &QvcClient,
    config: &AppConfig,
    now: DateTime<Utc>,
) -> CycleReport {
    let mut report = CycleReport::default();

    let targets = fetch_target_campaigns(shoplive, config, now).await;
    if targets.is_empty() {
        tracing::info!("no target campaigns");
        report.log();
        return report;
    }

    for target in &targets {
        report.campaigns += 1;
        process_campaign(shoplive, qvc, target, &config.snapshot_path, now, &mut report).await;
    }

    report.log();
    report
}

async fn process_campaign(
    shoplive: &ShopliveClient,
    qvc: &QvcClient,
    target: &TargetCampaign,
    snapshot_path: &Path,
    now: DateTime<Utc>,
    report: &mut CycleReport,
) {
    let meta = &target.meta;
    let key = meta.campaign_key.as_str();
    tracing::info!(
        campaign_key = key,
        title = meta.display_title(),
        starting_soon = target.starting_soon,
        "checking campaign"
    );

    let rows = match shoplive.list_campaign_products(key).await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!(campaign_key = key, error = %e, "failed to list campaign products");
            report.campaigns_failed += 1;
            return;
        }
    };
    if rows.is_empty() {
        tracing::info!(campaign_key = key, "campaign has no products");
        return;
    }

    let mut outcomes = Vec::with_capacity(rows.len());
    for row in rows {
        let outcome = match row {
            Ok(product) => check_product(qvc, &product).await,
            Err(e) => {
                tracing::warn!(campaign_key = key, error = %e, "skipping malformed product row");
                ProductOutcome::Skipped {
                    platform_id: None,
                    reason: SkipReason::MalformedProduct(e),
                }
            }
        };
        outcomes.push(outcome);
    }

    for (status, ids) in group_by_status(&outcomes) {
        match shoplive.update_stock_status(key, &ids, status).await {
            Ok(()) => {
                tracing::info!(campaign_key = key, %status, products = ids.len(), "stock status updated");
                report.groups_updated += 1;
            }
            Err(e) => {
                tracing::error!(campaign_key = key, %status, error = %e, "stock status update failed");
                report.groups_failed += 1;
            }
        }
    }

    let mut results = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        match outcome {
            ProductOutcome::Checked { result, .. } => {
                report.checked += 1;
                results.push(result);
            }
            ProductOutcome::Skipped { platform_id, reason } => {
                report.skipped += 1;
                tracing::debug!(platform_id, reason = %reason, "product skipped");
            }
        }
    }

    let snapshot = SnapshotDocument {
        updated_at: to_display(now),
        campaign: meta.display_title().to_owned(),
        products: results,
    };
    match save_document(snapshot_path, &snapshot) {
        Ok(()) => {
            report.snapshots_written += 1;
            tracing::info!(path = %snapshot_path.display(), "stock snapshot written");
        }
        Err(e) => {
            report.snapshots_failed += 1;
            tracing::error!(
                campaign_key = key,
                path = %snapshot_path.display(),
                error = %e,
                "failed to write stock snapshot"
            );
        }
    }
}

#[cfg(test)]
#[path = "snapshot_test.rs"]
mod tests;
