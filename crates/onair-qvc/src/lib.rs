pub mod client;
pub mod error;
pub mod product_id;
pub mod types;

pub use client::QvcClient;
pub use error::QvcError;
pub use product_id::extract_product_id;
pub use types::{QvcColour, QvcProductResponse, QvcSize};
