//! Fixtures shared by the command tests.

use std::path::Path;

use onair_core::AppConfig;
use serde_json::{json, Value};

pub(crate) const SECRET_B64: &str = "dGVzdC1zZWNyZXQta2V5";
pub(crate) const ACCESS_KEY: &str = "ak-1";

/// Config pointing both clients at `base` (a mock server URI) with retries
/// disabled and documents under `dir`.
pub(crate) fn test_config(base: &str, dir: &Path) -> AppConfig {
    AppConfig {
        shoplive_access_key: ACCESS_KEY.to_owned(),
        shoplive_secret_key: SECRET_B64.to_owned(),
        shoplive_api_base: format!("{base}/v2"),
        qvc_api_base: format!("{base}/qvc/products"),
        log_level: "debug".to_owned(),
        request_timeout_secs: 5,
        user_agent: "onair-test/0.1".to_owned(),
        max_retries: 0,
        retry_backoff_base_secs: 0,
        schedule_buffer_minutes: 5,
        default_live_duration_minutes: 60,
        ready_lead_minutes: 10,
        poll_interval_secs: 120,
        schedule_page_size: 50,
        schedule_path: dir.join("schedule.json"),
        snapshot_path: dir.join("output").join("stock_status.json"),
    }
}

pub(crate) fn campaign_entry(id: i64, status: &str, start: Option<&str>) -> Value {
    json!({
        "campaignMeta": {
            "campaignId": id,
            "campaignKey": format!("key-{id}"),
            "title": format!("Show {id}"),
            "campaignStatus": status,
            "scheduledStartAt": start,
            "scheduledEndAt": null
        }
    })
}

pub(crate) fn qvc_product(name: &str, codes: &[&str]) -> Value {
    let sizes: Vec<Value> = codes
        .iter()
        .enumerate()
        .map(|(i, code)| json!({ "sizeName": format!("S{i}"), "ats": code }))
        .collect();
    json!({
        "productName": name,
        "colours": [{ "colourName": "Navy", "sizes": sizes }]
    })
}
