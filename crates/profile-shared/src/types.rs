//! Common types

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Deserialize a timestamp that may come with or without a UTC offset.
///
/// Fixture files written by other tooling frequently omit the offset
/// (`2024-05-01T10:00:00`), those values are read as UTC.
pub fn deserialize_lenient_utc<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_lenient_utc(&raw).map_err(serde::de::Error::custom)
}

pub fn parse_lenient_utc(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| format!("invalid timestamp '{}': {}", raw, e))
}
