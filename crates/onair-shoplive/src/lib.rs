pub mod auth;
pub mod client;
pub mod error;
pub mod types;

pub use auth::TokenSigner;
pub use client::ShopliveClient;
pub use error::{MalformedProduct, ShopliveError};
pub use types::{CampaignListResponse, CampaignMeta, CampaignProduct, ProductRow};
