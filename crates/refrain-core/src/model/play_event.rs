use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Timestamp layout used by streaming-history exports (`2024-03-01 21:07`).
pub const END_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Alternative layouts accepted when the export carries seconds.
const FALLBACK_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%SZ"];

/// One row of a raw streaming-history export, as written by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamingRecord {
    pub end_time: String,
    pub artist_name: String,
    pub track_name: String,
    #[serde(default)]
    pub ms_played: u64,
}

/// A single play of a track, attributed to a user.
///
/// `hour` and `user` are derived when the event is loaded; they are not
/// part of the raw export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayEvent {
    pub track_name: String,
    pub artist_name: String,
    pub end_time: NaiveDateTime,
    /// Hour of day (0-23) taken from `end_time`.
    pub hour: u32,
    pub user: String,
}

impl PlayEvent {
    #[must_use]
    pub fn new(
        track_name: impl Into<String>,
        artist_name: impl Into<String>,
        end_time: NaiveDateTime,
        user: impl Into<String>,
    ) -> Self {
        Self {
            track_name: track_name.into(),
            artist_name: artist_name.into(),
            hour: end_time.hour(),
            end_time,
            user: user.into(),
        }
    }

    /// Build an event from a raw export row, attaching the user label.
    pub fn from_record(record: StreamingRecord, user: &str) -> Result<Self> {
        let end_time = parse_end_time(&record.end_time)?;
        Ok(Self::new(
            record.track_name,
            record.artist_name,
            end_time,
            user,
        ))
    }
}

/// Parse an `endTime` value from a streaming-history export.
pub fn parse_end_time(raw: &str) -> Result<NaiveDateTime> {
    let raw = raw.trim();
    std::iter::once(END_TIME_FORMAT)
        .chain(FALLBACK_FORMATS.iter().copied())
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .ok_or_else(|| Error::InvalidData(format!("unrecognised endTime: {raw:?}")))
}
