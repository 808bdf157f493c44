use std::path::PathBuf;

#[derive(Clone)]
pub struct AppConfig {
    pub shoplive_access_key: String,
    /// Base64-encoded HMAC secret used to sign Shoplive API tokens.
    pub shoplive_secret_key: String,
    pub shoplive_api_base: String,
    pub qvc_api_base: String,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
    pub schedule_buffer_minutes: u32,
    pub default_live_duration_minutes: u32,
    pub ready_lead_minutes: u32,
    pub poll_interval_secs: u64,
    pub schedule_page_size: u32,
    pub schedule_path: PathBuf,
    pub snapshot_path: PathBuf,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("shoplive_access_key", &"[redacted]")
            .field("shoplive_secret_key", &"[redacted]")
            .field("shoplive_api_base", &self.shoplive_api_base)
            .field("qvc_api_base", &self.qvc_api_base)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_secs", &self.retry_backoff_base_secs)
            .field("schedule_buffer_minutes", &self.schedule_buffer_minutes)
            .field(
                "default_live_duration_minutes",
                &self.default_live_duration_minutes,
            )
            .field("ready_lead_minutes", &self.ready_lead_minutes)
            .field("poll_interval_secs", &self.poll_interval_secs)
            .field("schedule_page_size", &self.schedule_page_size)
            .field("schedule_path", &self.schedule_path)
            .field("snapshot_path", &self.snapshot_path)
            .finish()
    }
}
