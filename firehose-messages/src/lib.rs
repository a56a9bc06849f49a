//! Status event types and transport forms for the firehose pipeline.
//!
//! This crate defines the canonical [`Status`] event, the raw JSON form the
//! feed delivers it in ([`RawStatus`]), and the [`StatusRecord`] wire model
//! that gets published to Kafka.
//!
//! # Example
//!
//! ```
//! use firehose_messages::{Status, StatusRecord};
//!
//! let raw = r#"{"created_at":"Tue Aug 04 09:15:02 +0000 2026","id":"42","text":"hello","user":{"id":"7"}}"#;
//! let status = Status::from_raw_json(raw).unwrap();
//! assert_eq!(status.id, 42);
//! assert_eq!(status.user_id, 7);
//!
//! let record = StatusRecord::from(&status);
//! assert_eq!(record.author_id, 7);
//! ```

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The feed-native `created_at` format, e.g. `Tue Aug 04 09:15:02 +0000 2026`.
pub const STATUS_DATE_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// Errors raised while turning a raw feed payload into a [`Status`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The payload was not valid status JSON.
    #[error("invalid status payload: {0}")]
    Json(String),

    /// An id field did not hold a decimal 64-bit integer.
    #[error("invalid numeric id '{0}'")]
    InvalidId(String),

    /// The `created_at` field was not in the feed-native format.
    #[error("invalid created_at timestamp '{0}'")]
    InvalidTimestamp(String),
}

/// Formats an instant in the feed-native `created_at` format.
pub fn format_created_at(at: DateTime<Utc>) -> String {
    at.format(STATUS_DATE_FORMAT).to_string()
}

/// Parses a feed-native `created_at` string back into an instant.
pub fn parse_created_at(value: &str) -> Result<DateTime<FixedOffset>, ParseError> {
    DateTime::parse_from_str(value, STATUS_DATE_FORMAT)
        .map_err(|_| ParseError::InvalidTimestamp(value.to_string()))
}

/// A status event as the pipeline sees it: one short text post with its
/// author and creation time. Constructed by a stream source, consumed once
/// by the listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub id: i64,
    /// Feed-native timestamp string, see [`STATUS_DATE_FORMAT`].
    pub created_at: String,
    pub text: String,
    pub user_id: i64,
}

impl Status {
    /// Parses the raw JSON form the feed delivers into a canonical status.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the payload is not valid JSON, an id is
    /// not a decimal integer, or the timestamp is not in the feed format.
    pub fn from_raw_json(raw: &str) -> Result<Self, ParseError> {
        let raw: RawStatus = serde_json::from_str(raw).map_err(|e| ParseError::Json(e.to_string()))?;
        Status::try_from(raw)
    }

    /// Serializes this status into the raw JSON form the feed would deliver.
    pub fn to_raw_json(&self) -> Result<String, ParseError> {
        serde_json::to_string(&RawStatus::from(self)).map_err(|e| ParseError::Json(e.to_string()))
    }
}

/// The raw transport form of a status. Both ids travel as strings and the
/// author sits in a nested `user` object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawStatus {
    pub created_at: String,
    pub id: String,
    pub text: String,
    pub user: RawUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawUser {
    pub id: String,
}

impl From<&Status> for RawStatus {
    fn from(status: &Status) -> Self {
        RawStatus {
            created_at: status.created_at.clone(),
            id: status.id.to_string(),
            text: status.text.clone(),
            user: RawUser {
                id: status.user_id.to_string(),
            },
        }
    }
}

impl TryFrom<RawStatus> for Status {
    type Error = ParseError;

    fn try_from(raw: RawStatus) -> Result<Self, Self::Error> {
        let id = raw
            .id
            .parse::<i64>()
            .map_err(|_| ParseError::InvalidId(raw.id.clone()))?;
        let user_id = raw
            .user
            .id
            .parse::<i64>()
            .map_err(|_| ParseError::InvalidId(raw.user.id.clone()))?;
        parse_created_at(&raw.created_at)?;

        Ok(Status {
            id,
            created_at: raw.created_at,
            text: raw.text,
            user_id,
        })
    }
}

/// The record published to Kafka. Structurally a [`Status`] with the author
/// under its wire name; all fields are mandatory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub id: i64,
    pub created_at: String,
    pub text: String,
    pub author_id: i64,
}

impl From<&Status> for StatusRecord {
    fn from(status: &Status) -> Self {
        StatusRecord {
            id: status.id,
            created_at: status.created_at.clone(),
            text: status.text.clone(),
            author_id: status.user_id,
        }
    }
}
