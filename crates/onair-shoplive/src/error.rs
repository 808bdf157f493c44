use thiserror::Error;

/// Errors returned by the Shoplive API client.
#[derive(Debug, Error)]
pub enum ShopliveError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The request token could not be signed (e.g. the secret is not valid base64).
    #[error("token signing error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("pagination limit reached for {status} campaigns: exceeded {max_pages} pages")]
    PaginationLimit { status: String, max_pages: u32 },
}

/// One row of a campaign product listing that could not be decoded.
///
/// The rest of the listing is unaffected.
#[derive(Debug, Error)]
#[error("product row {index} is malformed: {source}")]
pub struct MalformedProduct {
    /// Zero-based position of the row in the listing.
    pub index: usize,
    #[source]
    pub source: serde_json::Error,
}

impl ShopliveError {
    /// `true` for connect errors, timeouts, 429 and 5xx.
    #[must_use]
    pub fn is_retriable(&self) -> bool {
        match self {
            ShopliveError::Http(e) => e.is_timeout() || e.is_connect(),
            ShopliveError::UnexpectedStatus { status, .. } => *status == 429 || *status >= 500,
            ShopliveError::Token(_)
            | ShopliveError::Deserialize { .. }
            | ShopliveError::InvalidBaseUrl { .. }
            | ShopliveError::PaginationLimit { .. } => false,
        }
    }
}
