use anyhow::Context;
use onair_core::AppConfig;
use onair_qvc::QvcClient;
use onair_shoplive::ShopliveClient;

pub(crate) fn build_shoplive_client(config: &AppConfig) -> anyhow::Result<ShopliveClient> {
    ShopliveClient::with_base_url(
        &config.shoplive_api_base,
        &config.shoplive_access_key,
        &config.shoplive_secret_key,
        config.request_timeout_secs,
        &config.user_agent,
        config.max_retries,
        config.retry_backoff_base_secs,
    )
    .context("failed to build Shoplive client")
}

pub(crate) fn build_qvc_client(config: &AppConfig) -> anyhow::Result<QvcClient> {
    QvcClient::with_base_url(
        &config.qvc_api_base,
        config.request_timeout_secs,
        &config.user_agent,
        config.max_retries,
        config.retry_backoff_base_secs,
    )
    .context("failed to build QVC client")
}
