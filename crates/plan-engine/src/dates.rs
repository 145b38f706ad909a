//! Whole-day calendar arithmetic.
//!
//! Every comparison the engine makes is between calendar dates, never
//! between instants: an instant is first projected onto the local calendar of
//! an explicit timezone, the arithmetic happens on [`NaiveDate`], and the
//! time-of-day is reattached only when a view model needs an instant again.
//! Nothing here reads the system clock.

use chrono::{
    DateTime, Datelike, Days, Duration, LocalResult, Months, NaiveDate, NaiveTime, TimeZone,
    Timelike, Utc, Weekday,
};
use chrono_tz::Tz;

use crate::error::PlanError;

// ── Parsing ─────────────────────────────────────────────────────────────────

/// Parse an IANA timezone string into `Tz`.
pub fn parse_timezone(s: &str) -> Result<Tz, PlanError> {
    s.trim()
        .parse::<Tz>()
        .map_err(|_| PlanError::InvalidTimezone(format!("'{}'", s)))
}

/// Parse a calendar date.
///
/// Accepts `YYYY-MM-DD`, the compact `YYYYMMDD` form used by rule strings,
/// and full RFC 3339 instants (the UTC date is taken).
pub fn parse_date(s: &str) -> Result<NaiveDate, PlanError> {
    let s = s.trim();
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .or_else(|| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        .or_else(|| parse_compact_date(s))
        .ok_or_else(|| PlanError::InvalidDate(format!("'{}'", s)))
}

/// Parse the `YYYYMMDD` prefix of an `UNTIL` value.
///
/// A trailing time part (`T093000`, `T093000Z`) is ignored since the engine
/// only bounds series by whole days. Dashed dates are tolerated as well.
pub fn parse_compact_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let date_part = s.split(['T', 't']).next().unwrap_or(s);
    if date_part.len() == 8 && date_part.bytes().all(|b| b.is_ascii_digit()) {
        return NaiveDate::parse_from_str(date_part, "%Y%m%d").ok();
    }
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Parse an RFC 3339 instant into `DateTime<Utc>`.
pub fn parse_instant(s: &str) -> Result<DateTime<Utc>, PlanError> {
    DateTime::parse_from_rfc3339(s.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| PlanError::InvalidDate(format!("'{}': {}", s, e)))
}

// ── Instant ⇄ local calendar ────────────────────────────────────────────────

/// The local calendar date `instant` falls on in `tz`.
pub fn local_date(instant: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

/// The local wall-clock time of `instant` in `tz`, truncated to the minute.
pub fn local_time(instant: &DateTime<Utc>, tz: &Tz) -> NaiveTime {
    let time = instant.with_timezone(tz).time();
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}

/// Combine a local date and wall-clock time in `tz` into a UTC instant.
///
/// Ambiguous times (DST fall-back) resolve to the earlier instant. Times that
/// do not exist (DST spring-forward gap) are pushed forward by the gap.
pub fn at_local(date: NaiveDate, time: NaiveTime, tz: &Tz) -> DateTime<Utc> {
    let naive = date.and_time(time);
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => tz
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| naive.and_utc()),
    }
}

/// Whole minutes from `start` to `end`, clamped at zero.
pub fn whole_minutes_between(start: &DateTime<Utc>, end: &DateTime<Utc>) -> i64 {
    (*end - *start).num_minutes().max(0)
}

// ── Month and week arithmetic ───────────────────────────────────────────────

/// Number of days in the given month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (ny, nm) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(ny, nm, 1)
        .and_then(|first_next| first_next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

/// The first day of `date`'s month.
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// `date` moved forward by `months`, keeping the day-of-month and clamping it
/// to the length of the target month (Jan 31 + 1 month = Feb 28/29).
pub fn add_months_clamped(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(months))
}

/// The first day of the month `months` after `date`'s month, with the day
/// set to `day` clamped to that month's length.
pub fn month_day_clamped(date: NaiveDate, months: u32, day: u32) -> Option<NaiveDate> {
    let first = first_of_month(date).checked_add_months(Months::new(months))?;
    let day = day.clamp(1, days_in_month(first.year(), first.month()));
    first.with_day(day)
}

/// Whole calendar months from `from`'s month to `to`'s month (day ignored).
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to.year() as i64 * 12 + to.month0() as i64) - (from.year() as i64 * 12 + from.month0() as i64)
}

/// The Monday starting the ISO week containing `date`, if representable.
pub fn week_start(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_sub_days(Days::new(date.weekday().num_days_from_monday().into()))
}

/// The Sunday ending the ISO week containing `date`, if representable.
pub fn week_end(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_add_days(Days::new(
        (6 - date.weekday().num_days_from_monday()).into(),
    ))
}

/// Whole weeks between the weeks containing `from` and `to`.
pub fn weeks_between(from: NaiveDate, to: NaiveDate) -> i64 {
    let days = to.signed_duration_since(from).num_days()
        + i64::from(from.weekday().num_days_from_monday())
        - i64::from(to.weekday().num_days_from_monday());
    days.div_euclid(7)
}

/// Pick the `position`-th day of a month among the days whose weekday is in
/// `weekdays`. Positive positions count from the start of the month (1 =
/// first), negative ones from the end (-1 = last). Returns `None` when the
/// month has fewer matching days than requested or `position` is 0.
pub fn nth_matching_day_of_month(
    year: i32,
    month: u32,
    weekdays: &[Weekday],
    position: i32,
) -> Option<NaiveDate> {
    if position == 0 || weekdays.is_empty() {
        return None;
    }

    let matching: Vec<NaiveDate> = (1..=days_in_month(year, month))
        .filter_map(|d| NaiveDate::from_ymd_opt(year, month, d))
        .filter(|d| weekdays.contains(&d.weekday()))
        .collect();

    let index = if position > 0 {
        usize::try_from(position - 1).ok()?
    } else {
        matching.len().checked_sub(position.unsigned_abs() as usize)?
    };
    matching.get(index).copied()
}

// ── Weekday indices ─────────────────────────────────────────────────────────

/// Weekday from a Sunday-based index (0 = Sunday … 6 = Saturday).
pub fn weekday_from_index(index: u8) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

/// Sunday-based index of `weekday` (0 = Sunday … 6 = Saturday).
pub fn weekday_index(weekday: Weekday) -> u8 {
    weekday.num_days_from_sunday() as u8
}
