use thiserror::Error;

#[derive(Debug, Error)]
pub enum QvcError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("product not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl QvcError {
    /// `true` for response bodies that did not match the expected shape.
    #[must_use]
    pub fn is_parse_error(&self) -> bool {
        matches!(self, QvcError::Deserialize { .. })
    }

    /// `true` for failures worth another attempt: connect errors, timeouts,
    /// 429 and 5xx. A missing product or a malformed body is final.
    #[must_use]
    pub fn is_retriable(&self) -> bool {
        match self {
            QvcError::Http(e) => e.is_timeout() || e.is_connect(),
            QvcError::UnexpectedStatus { status, .. } => *status == 429 || *status >= 500,
            QvcError::NotFound { .. }
            | QvcError::Deserialize { .. }
            | QvcError::InvalidBaseUrl { .. } => false,
        }
    }
}
