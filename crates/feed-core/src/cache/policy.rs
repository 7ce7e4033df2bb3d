//! Cache freshness policy
//!
//! A cached feed is trusted for seven calendar days after it was written.
//! The window is never persisted; it is recomputed against "now" on every
//! read.

use chrono::{DateTime, Days, Local, TimeZone, Utc};

const MAX_CACHE_AGE_IN_DAYS: u64 = 7;

/// Is a cache written at `timestamp` still fresh at `against`?
///
/// Days are counted on the local calendar.
pub fn validate_timestamp(timestamp: DateTime<Utc>, against: DateTime<Utc>) -> bool {
    validate_timestamp_in(&Local, timestamp, against)
}

/// Same as [`validate_timestamp`], counting days on the calendar of `tz`.
///
/// Adding days happens on the wall clock of `tz`, so a DST shift inside the
/// window does not move the boundary by an hour. If the resulting wall-clock
/// time does not exist or is ambiguous in `tz` the cache is treated as stale.
pub fn validate_timestamp_in<Tz: TimeZone>(
    tz: &Tz,
    timestamp: DateTime<Utc>,
    against: DateTime<Utc>,
) -> bool {
    let Some(max_age) = timestamp
        .with_timezone(tz)
        .checked_add_days(Days::new(MAX_CACHE_AGE_IN_DAYS))
    else {
        return false;
    };
    against < max_age.with_timezone(&Utc)
}
