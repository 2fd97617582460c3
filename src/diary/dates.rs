//! Parsing of entry timestamps and the local-calendar helpers built on them.

use crate::constants::{DATETIME_FORMAT_NAIVE, DATE_FORMAT_ISO};
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime, TimeZone};

/// Parses an ISO-8601 entry date into local time.
///
/// Accepted forms, in order: RFC 3339 with offset or `Z`, a naive date-time
/// interpreted in the local zone, and a bare `YYYY-MM-DD` taken as local
/// midnight. A wall-clock time skipped by a daylight-saving change is read an
/// hour later.
///
/// # Examples
///
/// ```
/// use buddy_diary::diary::dates::parse_timestamp;
///
/// assert!(parse_timestamp("2024-01-15T10:30:00.000Z").is_some());
/// assert!(parse_timestamp("2024-01-15T10:30:00").is_some());
/// assert!(parse_timestamp("2024-01-15").is_some());
/// assert!(parse_timestamp("yesterday").is_none());
/// ```
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Local>> {
    let raw = raw.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Local));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT_NAIVE) {
        return resolve_local(&Local, naive);
    }

    NaiveDate::parse_from_str(raw, DATE_FORMAT_ISO)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .and_then(|naive| resolve_local(&Local, naive))
}

/// Places a wall-clock time in `tz`, taking the earlier instant when it is
/// ambiguous and shifting it forward an hour, the usual daylight-saving gap,
/// when it falls in a gap.
fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(&naive).earliest().or_else(|| {
        naive
            .checked_add_signed(Duration::hours(1))
            .and_then(|shifted| tz.from_local_datetime(&shifted).earliest())
    })
}

/// Weekday index with Sunday as 0 and Saturday as 6.
pub fn weekday_index(day: NaiveDate) -> usize {
    day.weekday().num_days_from_sunday() as usize
}

/// The day before `day`, or `None` at the start of the supported calendar.
pub fn previous_day(day: NaiveDate) -> Option<NaiveDate> {
    day.checked_sub_signed(Duration::days(1))
}

/// Whether `day` falls in the same month and year as `reference`.
pub fn same_month(day: NaiveDate, reference: NaiveDate) -> bool {
    day.year() == reference.year() && day.month() == reference.month()
}
