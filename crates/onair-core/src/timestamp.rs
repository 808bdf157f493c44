//! ISO-8601 timestamp handling.
//!
//! Upstream timestamps always carry an explicit offset, usually a trailing
//! `Z`. Everything is normalized to UTC for comparison; the broadcast
//! region's local offset (UTC+9) is only used for display.

use chrono::{DateTime, FixedOffset, Utc};
use thiserror::Error;

/// Offset used when rendering times for operators and overlay documents.
pub const DISPLAY_OFFSET_SECS: i32 = 9 * 3600;

#[derive(Debug, Error)]
pub enum TimestampError {
    #[error("invalid timestamp \"{value}\": {source}")]
    Invalid {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Parses an ISO-8601 timestamp with an explicit offset into UTC.
///
/// A trailing literal `Z` is rewritten to `+00:00` before parsing.
///
/// # Errors
///
/// Returns [`TimestampError::Invalid`] if the value is not an RFC 3339
/// timestamp after normalization.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, TimestampError> {
    let trimmed = value.trim();
    let normalized = match trimmed.strip_suffix('Z') {
        Some(head) => format!("{head}+00:00"),
        None => trimmed.to_owned(),
    };
    DateTime::parse_from_rfc3339(&normalized)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|source| TimestampError::Invalid {
            value: value.to_owned(),
            source,
        })
}

/// The display offset as a [`FixedOffset`].
#[must_use]
pub fn display_offset() -> FixedOffset {
    FixedOffset::east_opt(DISPLAY_OFFSET_SECS).expect("UTC+9 is a valid fixed offset")
}

/// Converts a UTC instant into the display offset.
#[must_use]
pub fn to_display(at: DateTime<Utc>) -> DateTime<FixedOffset> {
    at.with_timezone(&display_offset())
}

/// `HH:MM` in the display offset, for log lines.
#[must_use]
pub fn display_clock(at: DateTime<Utc>) -> String {
    to_display(at).format("%H:%M").to_string()
}

/// Serde adapter for required UTC timestamps.
///
/// Serializes as RFC 3339 with a `Z` suffix; deserializes through
/// [`parse_timestamp`].
pub mod utc {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    /// # Errors
    ///
    /// Fails when the value is not a string or does not parse.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for optional UTC timestamps. `null` and absent both map to `None`.
pub mod utc_option {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(at) => {
                serializer.serialize_some(&at.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            None => serializer.serialize_none(),
        }
    }

    /// # Errors
    ///
    /// Fails when a present value does not parse.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) if !raw.trim().is_empty() => super::parse_timestamp(&raw)
                .map(Some)
                .map_err(serde::de::Error::custom),
            _ => Ok(None),
        }
    }
}
