//! Short-lived request tokens for the Shoplive private API.
//!
//! Each request carries an HS256 JWT signed with the base64-decoded secret
//! key. The token names the access key and expires five minutes after
//! issue, so one is minted per request rather than cached.

use chrono::{DateTime, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Serialize;

use crate::error::ShopliveError;

/// Token lifetime in seconds.
pub const TOKEN_TTL_SECS: i64 = 300;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Claims<'a> {
    access_key: &'a str,
    iat: i64,
    exp: i64,
}

/// Signs request tokens for one access key.
pub struct TokenSigner {
    access_key: String,
    key: EncodingKey,
}

impl TokenSigner {
    /// # Errors
    ///
    /// Returns [`ShopliveError::Token`] if `secret_key_b64` is not valid base64.
    pub fn new(access_key: &str, secret_key_b64: &str) -> Result<Self, ShopliveError> {
        let key = EncodingKey::from_base64_secret(secret_key_b64.trim())?;
        Ok(Self {
            access_key: access_key.to_owned(),
            key,
        })
    }

    #[must_use]
    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    /// Signs a token issued at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`ShopliveError::Token`] if encoding fails.
    pub fn sign(&self, now: DateTime<Utc>) -> Result<String, ShopliveError> {
        let iat = now.timestamp();
        let claims = Claims {
            access_key: &self.access_key,
            iat,
            exp: iat + TOKEN_TTL_SECS,
        };
        Ok(encode(&Header::default(), &claims, &self.key)?)
    }
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("access_key", &"[redacted]")
            .field("key", &"[redacted]")
            .finish()
    }
}
