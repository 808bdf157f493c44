use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        match lookup(var) {
            Ok(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(ConfigError::MissingEnvVar(var.to_string())),
        }
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let shoplive_access_key = require("SHOPLIVE_ACCESS_KEY")?;
    let shoplive_secret_key = require("SHOPLIVE_SECRET_KEY")?;

    let shoplive_api_base = or_default(
        "ONAIR_SHOPLIVE_API_BASE",
        "https://private.shopliveapi.com/v2",
    );
    let qvc_api_base = or_default(
        "ONAIR_QVC_API_BASE",
        "https://qvc.jp/api/sales/presentation/v3/jp/products",
    );
    let log_level = or_default("ONAIR_LOG_LEVEL", "info");

    let request_timeout_secs = parse_u64("ONAIR_REQUEST_TIMEOUT_SECS", "10")?;
    let user_agent = or_default("ONAIR_USER_AGENT", "onair/0.1 (stock-sync)");
    let max_retries = parse_u32("ONAIR_MAX_RETRIES", "2")?;
    let retry_backoff_base_secs = parse_u64("ONAIR_RETRY_BACKOFF_BASE_SECS", "1")?;

    let schedule_buffer_minutes = parse_u32("ONAIR_SCHEDULE_BUFFER_MINUTES", "5")?;
    let default_live_duration_minutes = parse_u32("ONAIR_DEFAULT_LIVE_DURATION_MINUTES", "60")?;
    let ready_lead_minutes = parse_u32("ONAIR_READY_LEAD_MINUTES", "10")?;

    let poll_interval_secs = parse_u64("ONAIR_POLL_INTERVAL_SECS", "120")?;
    if poll_interval_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "ONAIR_POLL_INTERVAL_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    let schedule_page_size = parse_u32("ONAIR_SCHEDULE_PAGE_SIZE", "50")?;
    if schedule_page_size == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "ONAIR_SCHEDULE_PAGE_SIZE".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    let schedule_path = PathBuf::from(or_default("ONAIR_SCHEDULE_PATH", "./schedule.json"));
    let snapshot_path = PathBuf::from(or_default(
        "ONAIR_SNAPSHOT_PATH",
        "./output/stock_status.json",
    ));

    Ok(AppConfig {
        shoplive_access_key,
        shoplive_secret_key,
        shoplive_api_base,
        qvc_api_base,
        log_level,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_secs,
        schedule_buffer_minutes,
        default_live_duration_minutes,
        ready_lead_minutes,
        poll_interval_secs,
        schedule_page_size,
        schedule_path,
        snapshot_path,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
