// Copyright (C) 2026 Stayward Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Operational-day arithmetic for hotel properties.
//!
//! A hotel's "day" does not roll over at midnight: a guest walking in at
//! 02:00 belongs to the previous operational day. All boundaries here are
//! computed as wall-clock times in the property's declared timezone and
//! returned as UTC instants.
//!
//! ## Invariants
//!
//! - The operational day begins at `day_start_hour` local time (default 06:00)
//! - An instant before the boundary belongs to the previous operational day
//! - DST-nonexistent boundary times resolve one hour forward
//! - DST-ambiguous boundary times resolve to the earlier instant
//! - Ordering of instants is preserved by operational-date assignment

use crate::error::DomainError;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Default local hour at which a property's operational day begins.
pub const DEFAULT_DAY_START_HOUR: u32 = 6;

/// Parses an IANA timezone identifier.
fn resolve_tz(timezone: &str) -> Result<Tz, DomainError> {
    timezone
        .parse()
        .map_err(|_| DomainError::InvalidTimezone(timezone.to_string()))
}

/// Validates a day-start hour and returns it as a wall-clock time.
fn day_start_time(day_start_hour: u32) -> Result<NaiveTime, DomainError> {
    NaiveTime::from_hms_opt(day_start_hour, 0, 0).ok_or_else(|| {
        DomainError::InvalidTimeOfDay(format!("day start hour out of range: {day_start_hour}"))
    })
}

/// Resolves a local wall-clock datetime to a UTC instant.
///
/// Nonexistent local times (spring-forward gap) slide one hour later;
/// ambiguous local times (fall-back overlap) resolve to the earlier instant.
fn resolve_local(tz: Tz, naive: NaiveDateTime) -> DateTime<Utc> {
    match tz.from_local_datetime(&naive) {
        chrono::LocalResult::Single(dt) => dt.with_timezone(&Utc),
        chrono::LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        chrono::LocalResult::None => {
            let shifted = naive + Duration::hours(1);
            tz.from_local_datetime(&shifted)
                .earliest()
                .unwrap_or_else(|| tz.from_utc_datetime(&naive))
                .with_timezone(&Utc)
        }
    }
}

/// Returns the local calendar date an instant falls on in the given timezone,
/// adjusted for the operational day boundary.
fn local_operational_date(
    instant: DateTime<Utc>,
    tz: Tz,
    boundary: NaiveTime,
) -> chrono::NaiveDate {
    let local = instant.with_timezone(&tz);
    let mut date: NaiveDate = local.date_naive();
    if local.time() < boundary {
        date -= Duration::days(1);
    }
    date
}

/// Calculates the UTC instant at which the operational day containing
/// `instant` begins.
///
/// # Arguments
///
/// * `instant` - Any UTC instant
/// * `timezone` - IANA timezone identifier declared by the property
/// * `day_start_hour` - Local hour (0-23) at which the operational day begins
///
/// # Errors
///
/// Returns `DomainError::InvalidTimezone` for an unrecognized zone name, or
/// `DomainError::InvalidTimeOfDay` for an out-of-range hour.
pub fn operational_day_start(
    instant: DateTime<Utc>,
    timezone: &str,
    day_start_hour: u32,
) -> Result<DateTime<Utc>, DomainError> {
    let tz = resolve_tz(timezone)?;
    let boundary = day_start_time(day_start_hour)?;
    let date = local_operational_date(instant, tz, boundary);
    Ok(resolve_local(tz, date.and_time(boundary)))
}

/// Calculates the UTC instant at which the operational day containing
/// `instant` ends (exclusive), i.e. the start of the next operational day.
///
/// # Errors
///
/// Returns `DomainError::InvalidTimezone` for an unrecognized zone name, or
/// `DomainError::InvalidTimeOfDay` for an out-of-range hour.
pub fn operational_day_end(
    instant: DateTime<Utc>,
    timezone: &str,
    day_start_hour: u32,
) -> Result<DateTime<Utc>, DomainError> {
    let tz = resolve_tz(timezone)?;
    let boundary = day_start_time(day_start_hour)?;
    let date = local_operational_date(instant, tz, boundary) + Duration::days(1);
    Ok(resolve_local(tz, date.and_time(boundary)))
}

/// Returns the operational calendar date an instant belongs to.
///
/// An instant at 02:00 local time with a 06:00 boundary belongs to the
/// previous calendar date.
///
/// # Errors
///
/// Returns `DomainError::InvalidTimezone` for an unrecognized zone name, or
/// `DomainError::InvalidTimeOfDay` for an out-of-range hour.
pub fn operational_date(
    instant: DateTime<Utc>,
    timezone: &str,
    day_start_hour: u32,
) -> Result<chrono::NaiveDate, DomainError> {
    let tz = resolve_tz(timezone)?;
    let boundary = day_start_time(day_start_hour)?;
    Ok(local_operational_date(instant, tz, boundary))
}

/// Combines the local calendar date of `instant` with a wall-clock time of
/// day and returns the resulting UTC instant.
///
/// Used to anchor scheduled check-in and check-out times to a reservation's
/// stay dates in the property's timezone.
///
/// # Errors
///
/// Returns `DomainError::InvalidTimezone` for an unrecognized zone name.
pub fn wall_clock_instant(
    instant: DateTime<Utc>,
    time_of_day: NaiveTime,
    timezone: &str,
) -> Result<DateTime<Utc>, DomainError> {
    let tz = resolve_tz(timezone)?;
    let date = instant.with_timezone(&tz).date_naive();
    Ok(resolve_local(tz, date.and_time(time_of_day)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_instant_before_boundary_belongs_to_previous_day() {
        // 05:59 UTC in a UTC property with a 06:00 boundary
        let date = operational_date(utc(2026, 7, 10, 5, 59), "UTC", 6).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2026, 7, 9).unwrap());
    }

    #[test]
    fn test_instant_at_boundary_belongs_to_current_day() {
        let date = operational_date(utc(2026, 7, 10, 6, 0), "UTC", 6).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2026, 7, 10).unwrap());
    }

    #[test]
    fn test_day_start_and_end_span_twenty_four_hours() {
        let instant = utc(2026, 7, 10, 14, 30);
        let start = operational_day_start(instant, "America/New_York", 6).unwrap();
        let end = operational_day_end(instant, "America/New_York", 6).unwrap();

        // 06:00 EDT == 10:00 UTC
        assert_eq!(start, utc(2026, 7, 10, 10, 0));
        assert_eq!(end, utc(2026, 7, 11, 10, 0));
    }

    #[test]
    fn test_spring_forward_gap_resolves_one_hour_later() {
        // US DST begins 2026-03-08 at 02:00 local; a 02:00 boundary does not
        // exist on that date and must resolve to 03:00 EDT (07:00 UTC).
        let instant = utc(2026, 3, 8, 12, 0);
        let start = operational_day_start(instant, "America/New_York", 2).unwrap();
        assert_eq!(start, utc(2026, 3, 8, 7, 0));
    }

    #[test]
    fn test_fall_back_overlap_resolves_to_earlier_instant() {
        // US DST ends 2026-11-01 at 02:00 local; 01:00 occurs twice and the
        // earlier (EDT, UTC-4) instant wins.
        let instant = utc(2026, 11, 1, 12, 0);
        let start = operational_day_start(instant, "America/New_York", 1).unwrap();
        assert_eq!(start, utc(2026, 11, 1, 5, 0));
    }

    #[test]
    fn test_operational_date_preserves_instant_ordering() {
        let earlier = utc(2026, 3, 8, 5, 0);
        let later = utc(2026, 3, 9, 4, 0);
        let d1 = operational_date(earlier, "America/New_York", 6).unwrap();
        let d2 = operational_date(later, "America/New_York", 6).unwrap();
        assert!(d1 <= d2);
    }

    #[test]
    fn test_wall_clock_instant_uses_local_date() {
        // 02:00 UTC on July 10 is 22:00 July 9 in New York; the check-in
        // anchor lands on July 9 local.
        let instant = utc(2026, 7, 10, 2, 0);
        let anchor = wall_clock_instant(
            instant,
            NaiveTime::from_hms_opt(15, 0, 0).unwrap(),
            "America/New_York",
        )
        .unwrap();
        // 15:00 EDT on July 9 == 19:00 UTC
        assert_eq!(anchor, utc(2026, 7, 9, 19, 0));
    }

    #[test]
    fn test_invalid_timezone_is_rejected() {
        let result = operational_day_start(utc(2026, 7, 10, 12, 0), "Mars/Olympus_Mons", 6);
        assert_eq!(
            result,
            Err(DomainError::InvalidTimezone("Mars/Olympus_Mons".to_string()))
        );
    }

    #[test]
    fn test_out_of_range_day_start_hour_is_rejected() {
        let result = operational_day_start(utc(2026, 7, 10, 12, 0), "UTC", 24);
        assert!(matches!(result, Err(DomainError::InvalidTimeOfDay(_))));
    }
}
