//! Attendance arithmetic: day buckets, month windows and worked minutes.

use chrono::{Datelike, Days, NaiveDate};
use chrono_tz::Tz;

use crate::error::CoreError;
use crate::types::{Timestamp, WorkDate};

/// `type` tag carried by clock-in attendance events.
pub const CLOCK_IN: &str = "clock-in";

/// `type` tag carried by clock-out attendance events.
pub const CLOCK_OUT: &str = "clock-out";

/// The calendar day `at` falls on in time zone `tz`.
///
/// This is the attendance day bucket: one record per employee per value.
pub fn local_day(at: Timestamp, tz: Tz) -> WorkDate {
    at.with_timezone(&tz).date_naive()
}

/// First and last calendar day of `(year, month)`, both inclusive.
pub fn month_bounds(year: i32, month: u32) -> Result<(WorkDate, WorkDate), CoreError> {
    let invalid = || CoreError::Validation(format!("Invalid year/month: {year}-{month}"));

    let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let next_month = start.checked_add_months(chrono::Months::new(1)).ok_or_else(invalid)?;
    let end = next_month.checked_sub_days(Days::new(1)).ok_or_else(invalid)?;

    debug_assert_eq!(end.month(), month);
    Ok((start, end))
}

/// Validate an inclusive date range.
pub fn validate_date_range(start: WorkDate, end: WorkDate) -> Result<(), CoreError> {
    if end < start {
        return Err(CoreError::Validation(format!(
            "Date range end {end} is before start {start}"
        )));
    }
    Ok(())
}

/// Validate that a clock-out does not precede its clock-in.
pub fn validate_clock_times(
    clock_in: Option<Timestamp>,
    clock_out: Option<Timestamp>,
) -> Result<(), CoreError> {
    if let (Some(clock_in), Some(clock_out)) = (clock_in, clock_out) {
        if clock_out < clock_in {
            return Err(CoreError::Validation(format!(
                "Clock-out time {clock_out} is before clock-in time {clock_in}"
            )));
        }
    }
    Ok(())
}

/// Whole minutes worked between clock-in and clock-out, truncated.
///
/// A 90-second stay is 1 minute; a 59-second stay is 0. Callers must have
/// checked the ordering with [`validate_clock_times`].
pub fn work_minutes(clock_in: Timestamp, clock_out: Timestamp) -> i32 {
    let minutes = (clock_out - clock_in).num_minutes().max(0);
    i32::try_from(minutes).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn ninety_seconds_is_one_minute() {
        let t = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        assert_eq!(work_minutes(t, t + Duration::seconds(90)), 1);
    }

    #[test]
    fn fifty_nine_seconds_is_zero_minutes() {
        let t = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        assert_eq!(work_minutes(t, t + Duration::seconds(59)), 0);
    }

    #[test]
    fn full_day_minutes() {
        let t = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let out = t + Duration::hours(8) + Duration::minutes(30) + Duration::seconds(59);
        assert_eq!(work_minutes(t, out), 510);
    }

    #[test]
    fn february_leap_year_bounds() {
        assert_eq!(month_bounds(2024, 2).unwrap(), (ymd(2024, 2, 1), ymd(2024, 2, 29)));
        assert_eq!(month_bounds(2023, 2).unwrap(), (ymd(2023, 2, 1), ymd(2023, 2, 28)));
    }

    #[test]
    fn december_bounds_cross_year() {
        assert_eq!(month_bounds(2024, 12).unwrap(), (ymd(2024, 12, 1), ymd(2024, 12, 31)));
    }

    #[test]
    fn invalid_month_is_rejected() {
        assert_matches!(month_bounds(2024, 0), Err(CoreError::Validation(_)));
        assert_matches!(month_bounds(2024, 13), Err(CoreError::Validation(_)));
    }

    #[test]
    fn local_day_follows_time_zone() {
        // 2024-03-31T16:30Z is already April 1st in Tokyo.
        let at = Utc.with_ymd_and_hms(2024, 3, 31, 16, 30, 0).unwrap();
        assert_eq!(local_day(at, chrono_tz::Asia::Tokyo), ymd(2024, 4, 1));
        assert_eq!(local_day(at, chrono_tz::UTC), ymd(2024, 3, 31));
    }

    #[test]
    fn clock_out_before_clock_in_is_rejected() {
        let t = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        assert!(validate_clock_times(Some(t), Some(t - Duration::seconds(1))).is_err());
        assert!(validate_clock_times(Some(t), Some(t)).is_ok());
        assert!(validate_clock_times(None, Some(t)).is_ok());
    }

    #[test]
    fn reversed_date_range_is_rejected() {
        assert!(validate_date_range(ymd(2024, 2, 2), ymd(2024, 2, 1)).is_err());
        assert!(validate_date_range(ymd(2024, 2, 1), ymd(2024, 2, 1)).is_ok());
    }
}
