//! Conversion between Messages timestamps and calendar dates.
//!
//! `chat.db` stores `message.date` as nanoseconds since 2001-01-01 00:00:00 UTC
//! (the Cocoa reference date). Calendar bucketing uses local civil time, since
//! "which month did I send this" is a local question.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, TimeZone, Utc};
use std::ops::Range;

/// Seconds between the Unix epoch and 2001-01-01 00:00:00 UTC.
pub const APPLE_EPOCH_OFFSET_SECS: i64 = 978_307_200;

/// Native timestamps are nanoseconds.
pub const NANOS_PER_SEC: i64 = 1_000_000_000;

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Convert a native timestamp to a UTC instant.
///
/// Zero is the reference date itself; negative values are before it.
pub fn to_utc(timestamp: i64) -> DateTime<Utc> {
    // |secs| <= ~9.3e9 for any i64, far inside chrono's range, so neither the
    // addition nor the construction below can fail.
    let secs = timestamp.div_euclid(NANOS_PER_SEC) + APPLE_EPOCH_OFFSET_SECS;
    let nanos = timestamp.rem_euclid(NANOS_PER_SEC) as u32;
    DateTime::from_timestamp(secs, nanos).unwrap_or_default()
}

/// Convert a UTC instant to a native timestamp, saturating at the i64 bounds
/// (roughly 292 years either side of 2001).
pub fn from_utc(instant: DateTime<Utc>) -> i64 {
    let secs = instant.timestamp() - APPLE_EPOCH_OFFSET_SECS;
    secs.saturating_mul(NANOS_PER_SEC)
        .saturating_add(i64::from(instant.timestamp_subsec_nanos()))
}

/// `(year, month)` of a native timestamp in local time. Month is 1-12.
pub fn to_calendar_date(timestamp: i64) -> (i32, u32) {
    calendar_date_in(timestamp, &Local)
}

/// `(year, month)` of a native timestamp in the given time zone.
pub fn calendar_date_in<Tz: TimeZone>(timestamp: i64, tz: &Tz) -> (i32, u32) {
    let local = to_utc(timestamp).with_timezone(tz);
    (local.year(), local.month())
}

/// Native timestamp range covering `year` in local time.
pub fn year_range(year: i32) -> Range<i64> {
    year_range_in(year, &Local)
}

/// Native timestamp range `[Jan 1 year, Jan 1 year+1)` in the given zone.
pub fn year_range_in<Tz: TimeZone>(year: i32, tz: &Tz) -> Range<i64> {
    year_boundary(year, tz)..year_boundary(year.saturating_add(1), tz)
}

/// The report year used when none is given: last year, locally.
pub fn last_year() -> i32 {
    Local::now().year() - 1
}

fn year_boundary<Tz: TimeZone>(year: i32, tz: &Tz) -> i64 {
    match local_new_year(year, tz) {
        Some(instant) => from_utc(instant),
        None if year < 0 => i64::MIN,
        None => i64::MAX,
    }
}

/// Start of Jan 1 of `year` in `tz`, or None if chrono can't represent it.
///
/// When a clock jump skips local midnight, the day starts at the first local
/// minute that exists.
fn local_new_year<Tz: TimeZone>(year: i32, tz: &Tz) -> Option<DateTime<Utc>> {
    let midnight = NaiveDate::from_ymd_opt(year, 1, 1)?.and_hms_opt(0, 0, 0)?;
    let local = (0..MINUTES_PER_DAY)
        .find_map(|minute| {
            let wall = midnight.checked_add_signed(Duration::minutes(minute))?;
            tz.from_local_datetime(&wall).earliest()
        })
        .unwrap_or_else(|| tz.from_utc_datetime(&midnight));
    Some(local.with_timezone(&Utc))
}
