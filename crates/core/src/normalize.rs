//! # Timestamp Normalization
//!
//! Slot identity is an instant, never a wall-clock string. Everything that
//! compares, looks up, or stores a slot time goes through [`normalize`] first,
//! so a slot generated in business-local time, a row read back from storage in
//! UTC, and a client submission carrying its own offset all agree.

use std::fmt;

use chrono::{DateTime, SecondsFormat, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::errors::{BookingError, BookingResult};

/// Timezone-independent comparison key for a slot: Unix epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotKey(i64);

impl SlotKey {
    pub fn of<Z: TimeZone>(instant: &DateTime<Z>) -> Self {
        SlotKey(instant.timestamp())
    }

    pub fn seconds(&self) -> i64 {
        self.0
    }
}

impl<Z: TimeZone> From<&DateTime<Z>> for SlotKey {
    fn from(instant: &DateTime<Z>) -> Self {
        SlotKey::of(instant)
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Converts any zoned instant to the stored form: UTC, whole seconds.
pub fn normalize<Z: TimeZone>(instant: &DateTime<Z>) -> DateTime<Utc> {
    let utc = instant.with_timezone(&Utc);
    // Stored keys carry whole seconds only.
    utc.with_nanosecond(0).unwrap_or(utc)
}

/// Parses an inbound RFC 3339 slot time and normalizes it immediately.
pub fn parse_slot_time(raw: &str) -> BookingResult<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(BookingError::Validation("slot_time is required".to_string()));
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|parsed| normalize(&parsed))
        .map_err(|_| BookingError::Validation("Invalid slot_time format".to_string()))
}

/// Renders an instant as RFC 3339 in the given zone, e.g. `2025-06-02T11:30:00+02:00`.
pub fn format_in_zone(instant: &DateTime<Utc>, timezone: &Tz) -> String {
    instant
        .with_timezone(timezone)
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}
