use crate::errors::{ErrorKind, TesseraError, TesseraResult};
use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use std::time::{SystemTime, UNIX_EPOCH};

// returns 0 on any clock error instead of failing the caller
#[inline]
pub fn get_current_time_or_zero() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

/// Current instant truncated to millisecond precision, the resolution the wire
/// format keeps for dates.
pub fn now_millis() -> DateTime<Utc> {
    truncate_to_millis(Utc::now())
}

pub fn truncate_to_millis(timestamp: DateTime<Utc>) -> DateTime<Utc> {
    let millis = timestamp.timestamp_millis();
    Utc.timestamp_millis_opt(millis).single().unwrap_or(timestamp)
}

pub fn timestamp_from_millis(millis: i64) -> TesseraResult<DateTime<Utc>> {
    match DateTime::<Utc>::from_timestamp_millis(millis) {
        Some(timestamp) => Ok(timestamp),
        None => {
            log::error!("Epoch milliseconds {} are out of range", millis);
            Err(TesseraError::new(
                &format!("Epoch milliseconds {} are out of range", millis),
                ErrorKind::InvalidDataType,
            ))
        }
    }
}

/// Parses an RFC 3339 timestamp into UTC.
pub fn parse_timestamp(text: &str) -> TesseraResult<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(text.trim()).map_err(|e| {
        log::error!("'{}' is not an RFC 3339 timestamp: {}", text, e);
        TesseraError::from(e)
    })?;
    Ok(parsed.with_timezone(&Utc))
}

pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}
