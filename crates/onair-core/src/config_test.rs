use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with all required env vars populated with valid defaults.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("SHOPLIVE_ACCESS_KEY", "test-access-key");
    m.insert("SHOPLIVE_SECRET_KEY", "c2VjcmV0LWtleQ==");
    m
}

#[test]
fn build_app_config_fails_without_access_key() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "SHOPLIVE_ACCESS_KEY"),
        "expected MissingEnvVar(SHOPLIVE_ACCESS_KEY), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_without_secret_key() {
    let mut map: HashMap<&str, &str> = HashMap::new();
    map.insert("SHOPLIVE_ACCESS_KEY", "test-access-key");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "SHOPLIVE_SECRET_KEY"),
        "expected MissingEnvVar(SHOPLIVE_SECRET_KEY), got: {result:?}"
    );
}

#[test]
fn build_app_config_treats_blank_secret_as_missing() {
    let mut map = full_env();
    map.insert("SHOPLIVE_SECRET_KEY", "   ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "SHOPLIVE_SECRET_KEY"),
        "expected MissingEnvVar(SHOPLIVE_SECRET_KEY), got: {result:?}"
    );
}

#[test]
fn build_app_config_succeeds_with_all_required_vars() {
    let map = full_env();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.shoplive_access_key, "test-access-key");
    assert_eq!(cfg.shoplive_api_base, "https://private.shopliveapi.com/v2");
    assert_eq!(
        cfg.qvc_api_base,
        "https://qvc.jp/api/sales/presentation/v3/jp/products"
    );
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.request_timeout_secs, 10);
    assert_eq!(cfg.user_agent, "onair/0.1 (stock-sync)");
    assert_eq!(cfg.max_retries, 2);
    assert_eq!(cfg.retry_backoff_base_secs, 1);
    assert_eq!(cfg.schedule_buffer_minutes, 5);
    assert_eq!(cfg.default_live_duration_minutes, 60);
    assert_eq!(cfg.ready_lead_minutes, 10);
    assert_eq!(cfg.poll_interval_secs, 120);
    assert_eq!(cfg.schedule_page_size, 50);
    assert_eq!(cfg.schedule_path.to_str(), Some("./schedule.json"));
    assert_eq!(
        cfg.snapshot_path.to_str(),
        Some("./output/stock_status.json")
    );
}

#[test]
fn buffer_minutes_override() {
    let mut map = full_env();
    map.insert("ONAIR_SCHEDULE_BUFFER_MINUTES", "15");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.schedule_buffer_minutes, 15);
}

#[test]
fn buffer_minutes_invalid() {
    let mut map = full_env();
    map.insert("ONAIR_SCHEDULE_BUFFER_MINUTES", "five");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ONAIR_SCHEDULE_BUFFER_MINUTES"),
        "expected InvalidEnvVar(ONAIR_SCHEDULE_BUFFER_MINUTES), got: {result:?}"
    );
}

#[test]
fn default_live_duration_override() {
    let mut map = full_env();
    map.insert("ONAIR_DEFAULT_LIVE_DURATION_MINUTES", "90");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.default_live_duration_minutes, 90);
}

#[test]
fn request_timeout_invalid() {
    let mut map = full_env();
    map.insert("ONAIR_REQUEST_TIMEOUT_SECS", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ONAIR_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(ONAIR_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn poll_interval_rejects_zero() {
    let mut map = full_env();
    map.insert("ONAIR_POLL_INTERVAL_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ONAIR_POLL_INTERVAL_SECS"),
        "expected InvalidEnvVar(ONAIR_POLL_INTERVAL_SECS), got: {result:?}"
    );
}

#[test]
fn schedule_page_size_rejects_zero() {
    let mut map = full_env();
    map.insert("ONAIR_SCHEDULE_PAGE_SIZE", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ONAIR_SCHEDULE_PAGE_SIZE"),
        "expected InvalidEnvVar(ONAIR_SCHEDULE_PAGE_SIZE), got: {result:?}"
    );
}

#[test]
fn paths_override() {
    let mut map = full_env();
    map.insert("ONAIR_SCHEDULE_PATH", "/var/lib/onair/schedule.json");
    map.insert("ONAIR_SNAPSHOT_PATH", "/srv/overlay/stock.json");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.schedule_path.to_str(),
        Some("/var/lib/onair/schedule.json")
    );
    assert_eq!(cfg.snapshot_path.to_str(), Some("/srv/overlay/stock.json"));
}

#[test]
fn debug_output_redacts_credentials() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("test-access-key"));
    assert!(!rendered.contains("c2VjcmV0LWtleQ=="));
    assert!(rendered.contains("[redacted]"));
}
