//! Timestamp utilities for anonboard.
//!
//! All timestamps are UTC with microsecond precision, which is what the
//! SQLite backend stores (as integer microseconds since the Unix epoch).

use chrono::{DateTime, SubsecRound, Utc};

use crate::{AnonboardError, Result};

/// Current time, truncated to microseconds.
///
/// Truncating up front means a value taken here survives a round trip
/// through any repository unchanged.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Convert a timestamp to integer microseconds for storage.
pub fn to_micros(dt: &DateTime<Utc>) -> i64 {
    dt.timestamp_micros()
}

/// Convert stored integer microseconds back to a timestamp.
pub fn from_micros(micros: i64) -> Result<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_micros(micros)
        .ok_or_else(|| AnonboardError::Database(format!("timestamp out of range: {micros}")))
}
