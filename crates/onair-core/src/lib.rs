pub mod app_config;
pub mod campaign;
pub mod config;
pub mod document;
pub mod retry;
pub mod stock;
pub mod timestamp;
pub mod window;

pub use app_config::AppConfig;
pub use campaign::{Campaign, CampaignStatus, ScheduleDocument};
pub use config::{load_app_config, load_app_config_from_env};
pub use document::{load_document, read_schedule, save_document, DocumentError};
pub use stock::{aggregate_status, AvailabilityCode, SnapshotDocument, StockResult, StockStatus, Variant};
pub use timestamp::{parse_timestamp, to_display, TimestampError};
pub use window::{starts_within_lead, LiveWindow, WindowPolicy};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
