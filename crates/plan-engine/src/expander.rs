//! Occurrence expansion: plan + window → raw dated occurrences.
//!
//! Expansion happens on whole local dates. The plan's anchor instant is
//! projected onto the calendar of [`ExpansionOptions::timezone`], the series
//! is walked by [`Occurrences`], and the anchor's time-of-day is reattached
//! to every emitted date.
//!
//! # Series semantics
//!
//! - The anchor date is always the first occurrence of the series, even when
//!   it does not match the config's weekday or month-day pattern.
//! - `count` is a lifetime cap on the series counted from the anchor:
//!   occurrences before the window consume it even though they are not
//!   returned.
//! - Monthly and yearly series step from the anchor's month: after the
//!   anchor, the next date falls `interval` months (or years) later, never
//!   later in the anchor's own month.
//! - The series stops at the earliest of the window end, the plan's
//!   `recurrence_end_date` and the config's `UNTIL` date, all inclusive.
//! - Weeks start on Monday when deciding which weeks an `interval` skips.

use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, NaiveTime, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::dates::{
    add_months_clamped, first_of_month, local_date, local_time, month_day_clamped,
    months_between, nth_matching_day_of_month, parse_date, week_end, week_start, weeks_between,
};
use crate::error::PlanError;
use crate::exception::{ExceptionType, InstanceOverrides};
use crate::plan::Plan;
use crate::rule::{Frequency, MonthlyPattern, RecurrenceConfig};

/// Default cap on the number of dates one expansion may visit.
pub const DEFAULT_MAX_ITERATIONS: usize = 1000;

/// Periods a monthly/yearly walker may pass without finding a date before it
/// gives up (a fifth weekday is missing from most months).
const MAX_EMPTY_PERIODS: u32 = 64;

// ── Options and window ──────────────────────────────────────────────────────

/// Knobs for [`expand`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpansionOptions {
    /// Calendar used to turn instants into whole days.
    pub timezone: Tz,
    /// Upper bound on the dates visited per expansion.
    pub max_iterations: usize,
}

impl Default for ExpansionOptions {
    fn default() -> Self {
        ExpansionOptions {
            timezone: Tz::UTC,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// A closed range of calendar dates, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// # Errors
    ///
    /// Returns [`PlanError::InvalidWindow`] if `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, PlanError> {
        if start > end {
            return Err(PlanError::InvalidWindow(format!(
                "start {} is after end {}",
                start, end
            )));
        }
        Ok(DateWindow { start, end })
    }

    /// Parse both ends with [`parse_date`].
    pub fn parse(start: &str, end: &str) -> Result<Self, PlanError> {
        DateWindow::new(parse_date(start)?, parse_date(end)?)
    }

    /// The local dates `start` and `end` fall on in `tz`.
    pub fn from_instants(
        start: &DateTime<Utc>,
        end: &DateTime<Utc>,
        tz: &Tz,
    ) -> Result<Self, PlanError> {
        DateWindow::new(local_date(start, tz), local_date(end, tz))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

// ── Anchor ──────────────────────────────────────────────────────────────────

/// The plan's own start/end projected onto the local calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// Length of the anchor instance; zero when the end is missing or not
    /// after the start.
    pub duration: Duration,
}

impl Anchor {
    /// `None` when the plan has no start time: recurrence is undefined
    /// without an anchor.
    pub fn of(plan: &Plan, tz: &Tz) -> Option<Self> {
        let start = plan.start_time?;
        let end = plan.end_time.filter(|end| *end >= start).unwrap_or(start);
        Some(Anchor {
            date: local_date(&start, tz),
            start_time: local_time(&start, tz),
            end_time: local_time(&end, tz),
            duration: end - start,
        })
    }

    /// A plain occurrence of `plan_id` on `date` with the anchor's times.
    pub fn occurrence(&self, plan_id: &str, date: NaiveDate) -> ExpandedOccurrence {
        ExpandedOccurrence {
            date,
            start_time: self.start_time,
            end_time: self.end_time,
            plan_id: plan_id.to_string(),
            is_exception: false,
            exception_type: None,
            overrides: InstanceOverrides::default(),
        }
    }
}

// ── ExpandedOccurrence ──────────────────────────────────────────────────────

/// One concrete occurrence. Recomputed on every call, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpandedOccurrence {
    pub date: NaiveDate,
    /// Local time-of-day, serialized as `HH:MM`.
    #[serde(with = "hh_mm")]
    pub start_time: NaiveTime,
    #[serde(with = "hh_mm")]
    pub end_time: NaiveTime,
    pub plan_id: String,
    pub is_exception: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception_type: Option<ExceptionType>,
    #[serde(default, skip_serializing_if = "InstanceOverrides::is_empty")]
    pub overrides: InstanceOverrides,
}

mod hh_mm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&s, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&s, "%H:%M:%S"))
            .map_err(serde::de::Error::custom)
    }
}

// ── Occurrences ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Stepper {
    Daily { interval: u32 },
    Weekly { interval: u32 },
    WeeklyOn { interval: u32, weekdays: Vec<Weekday> },
    Monthly { interval: u32, pattern: MonthlyPattern },
    Yearly { interval: u32 },
}

/// Outcome of asking a periodic stepper for its date in one period.
enum Slot {
    Hit(NaiveDate),
    /// The period has no matching date (e.g. no fifth Monday).
    Miss,
    /// Date arithmetic left the representable range.
    OutOfRange,
}

/// Lazy, strictly increasing sequence of series dates starting at the anchor.
///
/// The sequence is finite by construction: it yields at most `max_steps`
/// dates, and it ends as soon as a step fails to move forward. Restart by
/// building a new one.
#[derive(Debug, Clone)]
pub struct Occurrences {
    anchor: NaiveDate,
    stepper: Stepper,
    last: Option<NaiveDate>,
    next_period: u32,
    emitted: usize,
    max_steps: usize,
    done: bool,
}

impl Occurrences {
    pub fn new(anchor: NaiveDate, config: &RecurrenceConfig, max_steps: usize) -> Self {
        let interval = config.interval.max(1);
        let stepper = match config.frequency {
            Frequency::Daily => Stepper::Daily { interval },
            Frequency::Weekly if config.by_weekday.is_empty() => Stepper::Weekly { interval },
            Frequency::Weekly => Stepper::WeeklyOn {
                interval,
                weekdays: config.by_weekday.clone(),
            },
            Frequency::Monthly => Stepper::Monthly {
                interval,
                pattern: config.monthly_pattern(),
            },
            Frequency::Yearly => Stepper::Yearly { interval },
        };
        Occurrences {
            anchor,
            stepper,
            last: None,
            next_period: 1,
            emitted: 0,
            max_steps,
            done: false,
        }
    }

    /// Skip ahead so the next yielded date is the first series date on or
    /// after `from`. Skipped dates do not count toward `max_steps`; use
    /// [`seek_counted`](Self::seek_counted) when a `count` budget applies.
    pub fn seek(&mut self, from: NaiveDate) {
        if from <= self.anchor || self.last.is_some_and(|last| last >= from) {
            return;
        }
        self.last = from.pred_opt().or(self.last);

        let units = match &self.stepper {
            Stepper::Daily { .. } => (from - self.anchor).num_days(),
            Stepper::Weekly { .. } => (from - self.anchor).num_days() / 7,
            Stepper::Monthly { .. } => months_between(self.anchor, from),
            Stepper::Yearly { .. } => months_between(self.anchor, from) / 12,
            Stepper::WeeklyOn { .. } => return,
        };
        let period = (units / self.interval() as i64).saturating_sub(1).max(1);
        let period = u32::try_from(period).unwrap_or(u32::MAX);
        self.next_period = self.next_period.max(period);
    }

    /// [`seek`](Self::seek) for series with exactly one date per period,
    /// returning how many series dates before `from` were passed over.
    ///
    /// Returns `None` and leaves the iterator untouched for weekday-list and
    /// set-position series, whose skipped dates can only be found by walking.
    pub fn seek_counted(&mut self, from: NaiveDate) -> Option<usize> {
        let one_per_period = match &self.stepper {
            Stepper::Daily { .. } | Stepper::Weekly { .. } | Stepper::Yearly { .. } => true,
            Stepper::Monthly { pattern, .. } => matches!(
                pattern,
                MonthlyPattern::DayOfMonth(_) | MonthlyPattern::AnchorDay
            ),
            Stepper::WeeklyOn { .. } => false,
        };
        if !one_per_period {
            return None;
        }
        if from <= self.anchor || self.last.is_some_and(|last| last >= from) {
            return Some(0);
        }

        let anchor_skipped = self.last.is_none();
        let before = self.next_period;
        self.seek(from);
        while let Slot::Hit(date) = self.slot(self.next_period) {
            if date >= from {
                break;
            }
            let Some(next) = self.next_period.checked_add(1) else {
                break;
            };
            self.next_period = next;
        }

        let periods = usize::try_from(self.next_period - before).unwrap_or(usize::MAX);
        Some(periods.saturating_add(usize::from(anchor_skipped)))
    }

    /// Whether `date` belongs to the series pattern, ignoring any end
    /// condition.
    pub fn contains(&self, date: NaiveDate) -> bool {
        let mut probe = Occurrences {
            last: None,
            next_period: 1,
            emitted: 0,
            max_steps: usize::MAX,
            done: false,
            ..self.clone()
        };
        probe.seek(date);
        probe.next() == Some(date)
    }

    fn interval(&self) -> u32 {
        match &self.stepper {
            Stepper::Daily { interval }
            | Stepper::Weekly { interval }
            | Stepper::WeeklyOn { interval, .. }
            | Stepper::Monthly { interval, .. }
            | Stepper::Yearly { interval } => *interval,
        }
    }

    /// The date the stepper assigns to period `k`, counted in intervals from
    /// the anchor's period. Stepping starts at `k = 1`.
    fn slot(&self, k: u32) -> Slot {
        let hit = |d: Option<NaiveDate>| d.map_or(Slot::OutOfRange, Slot::Hit);
        let Some(periods) = k.checked_mul(self.interval()) else {
            return Slot::OutOfRange;
        };

        match &self.stepper {
            Stepper::Daily { .. } => hit(self.anchor.checked_add_days(Days::new(periods.into()))),
            Stepper::Weekly { .. } => {
                hit(self.anchor.checked_add_days(Days::new(u64::from(periods) * 7)))
            }
            Stepper::Monthly { pattern, .. } => match pattern {
                MonthlyPattern::DayOfMonth(day) => {
                    hit(month_day_clamped(self.anchor, periods, *day))
                }
                MonthlyPattern::AnchorDay => hit(add_months_clamped(self.anchor, periods)),
                MonthlyPattern::SetPosition { weekdays, position } => {
                    match add_months_clamped(first_of_month(self.anchor), periods) {
                        Some(month) => nth_matching_day_of_month(
                            month.year(),
                            month.month(),
                            weekdays,
                            *position,
                        )
                        .map_or(Slot::Miss, Slot::Hit),
                        None => Slot::OutOfRange,
                    }
                }
            },
            Stepper::Yearly { .. } => match periods.checked_mul(12) {
                Some(months) => hit(add_months_clamped(self.anchor, months)),
                None => Slot::OutOfRange,
            },
            Stepper::WeeklyOn { .. } => Slot::OutOfRange,
        }
    }

    /// Next periodic date strictly after `last`.
    fn next_periodic(&mut self, last: NaiveDate) -> Option<NaiveDate> {
        for _ in 0..MAX_EMPTY_PERIODS {
            let k = self.next_period;
            self.next_period = k.checked_add(1)?;
            match self.slot(k) {
                Slot::Hit(date) if date > last => return Some(date),
                Slot::Hit(_) | Slot::Miss => continue,
                Slot::OutOfRange => return None,
            }
        }
        None
    }

    /// Next date after `last` whose weekday is listed and whose week is an
    /// active week (a multiple of `interval` weeks from the anchor's week).
    /// Looks at the rest of `last`'s week, then at the next active week, so
    /// at most 13 days are examined whatever the interval.
    fn next_weekly_on(&self, last: NaiveDate) -> Option<NaiveDate> {
        let Stepper::WeeklyOn { interval, weekdays } = &self.stepper else {
            return None;
        };
        let interval = i64::from(*interval);
        let week_index = weeks_between(self.anchor, last);
        let matches = |d: &NaiveDate| weekdays.contains(&d.weekday());

        if week_index.rem_euclid(interval) == 0 {
            let end_of_week = week_end(last).unwrap_or(NaiveDate::MAX);
            let mut rest = last.iter_days().skip(1).take_while(|d| *d <= end_of_week);
            if let Some(date) = rest.find(matches) {
                return Some(date);
            }
        }

        let next_active = (week_index.div_euclid(interval) + 1).checked_mul(interval)?;
        let offset = u64::try_from(next_active.checked_mul(7)?).ok()?;
        let next_week = week_start(self.anchor)?.checked_add_days(Days::new(offset))?;
        next_week.iter_days().take(7).find(matches)
    }
}

impl Iterator for Occurrences {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        if self.done {
            return None;
        }
        if self.emitted >= self.max_steps {
            self.done = true;
            tracing::warn!(
                anchor = %self.anchor,
                max_steps = self.max_steps,
                "recurrence expansion stopped at iteration cap"
            );
            return None;
        }

        let next = match self.last {
            None => Some(self.anchor),
            Some(last) if matches!(self.stepper, Stepper::WeeklyOn { .. }) => {
                self.next_weekly_on(last)
            }
            Some(last) => self.next_periodic(last),
        };

        match next {
            Some(date) if self.last.map_or(true, |last| date > last) => {
                self.last = Some(date);
                self.emitted += 1;
                Some(date)
            }
            _ => {
                self.done = true;
                None
            }
        }
    }
}

impl std::iter::FusedIterator for Occurrences {}

// ── expand ──────────────────────────────────────────────────────────────────

/// Raw occurrences of `plan` inside `window`, before exceptions.
///
/// Returns an empty list when the plan has no start time or no resolvable
/// recurrence. Never fails: malformed configs end early instead.
///
/// # Examples
///
/// ```
/// use plan_engine::expander::{expand, DateWindow, ExpansionOptions};
/// use plan_engine::plan::{Plan, RecurrenceType};
///
/// let mut plan = Plan::new("p1", "Standup");
/// plan.start_time = Some("2025-03-01T09:00:00Z".parse().unwrap());
/// plan.recurrence_type = Some(RecurrenceType::Daily);
///
/// let window = DateWindow::parse("2025-03-01", "2025-03-07").unwrap();
/// let occurrences = expand(&plan, &window, &ExpansionOptions::default());
/// assert_eq!(occurrences.len(), 7);
/// ```
pub fn expand(
    plan: &Plan,
    window: &DateWindow,
    options: &ExpansionOptions,
) -> Vec<ExpandedOccurrence> {
    let Some(anchor) = Anchor::of(plan, &options.timezone) else {
        return Vec::new();
    };
    let Some(config) = plan.recurrence_config(anchor.date) else {
        return Vec::new();
    };
    expand_config(&plan.id, &anchor, &config, plan.recurrence_end_date, window, options)
}

/// Expansion for an already-resolved config.
pub fn expand_config(
    plan_id: &str,
    anchor: &Anchor,
    config: &RecurrenceConfig,
    recurrence_end_date: Option<NaiveDate>,
    window: &DateWindow,
    options: &ExpansionOptions,
) -> Vec<ExpandedOccurrence> {
    // Earliest of the window end, the plan's end date and UNTIL.
    let stop = [Some(window.end), recurrence_end_date, config.until()]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(window.end);

    let mut series = Occurrences::new(anchor.date, config, options.max_iterations);
    let budget = match config.count() {
        Some(count) => {
            let count = usize::try_from(count).unwrap_or(usize::MAX);
            let skipped = series.seek_counted(window.start).unwrap_or(0);
            count.saturating_sub(skipped)
        }
        None => {
            series.seek(window.start);
            usize::MAX
        }
    };

    let occurrences: Vec<ExpandedOccurrence> = series
        .take(budget)
        .take_while(|date| *date <= stop)
        .filter(|date| *date >= window.start)
        .map(|date| anchor.occurrence(plan_id, date))
        .collect();

    tracing::debug!(
        plan_id,
        window_start = %window.start,
        window_end = %window.end,
        count = occurrences.len(),
        "expanded recurrence"
    );
    occurrences
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::RecurrenceType;
    use crate::rule::{rule_to_config, RecurrenceEnd};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn window(start: NaiveDate, end: NaiveDate) -> DateWindow {
        DateWindow::new(start, end).unwrap()
    }

    fn series(anchor: NaiveDate, rule: &str, n: usize) -> Vec<NaiveDate> {
        let config = rule_to_config(rule).unwrap();
        Occurrences::new(anchor, &config, DEFAULT_MAX_ITERATIONS)
            .take(n)
            .collect()
    }

    fn plan_with(start: &str, end: &str) -> Plan {
        let mut plan = Plan::new("plan-1", "Standup");
        plan.start_time = Some(start.parse().unwrap());
        plan.end_time = Some(end.parse().unwrap());
        plan
    }

    fn dates(occurrences: &[ExpandedOccurrence]) -> Vec<NaiveDate> {
        occurrences.iter().map(|o| o.date).collect()
    }

    // ── Occurrences stepping tests ──────────────────────────────────────

    #[test]
    fn test_daily_interval() {
        let got = series(date(2025, 3, 1), "FREQ=DAILY;INTERVAL=3", 4);
        assert_eq!(
            got,
            vec![date(2025, 3, 1), date(2025, 3, 4), date(2025, 3, 7), date(2025, 3, 10)]
        );
    }

    #[test]
    fn test_weekly_without_weekdays() {
        let got = series(date(2025, 3, 5), "FREQ=WEEKLY;INTERVAL=2", 3);
        assert_eq!(got, vec![date(2025, 3, 5), date(2025, 3, 19), date(2025, 4, 2)]);
    }

    #[test]
    fn test_weekly_multiple_weekdays() {
        // Anchor Monday Mar 3 2025
        let got = series(date(2025, 3, 3), "FREQ=WEEKLY;BYDAY=MO,WE,FR", 6);
        assert_eq!(
            got,
            vec![
                date(2025, 3, 3),
                date(2025, 3, 5),
                date(2025, 3, 7),
                date(2025, 3, 10),
                date(2025, 3, 12),
                date(2025, 3, 14),
            ]
        );
    }

    #[test]
    fn test_weekly_interval_skips_whole_weeks() {
        // Every other week on Tue/Thu, anchored Tuesday Mar 4 2025
        let got = series(date(2025, 3, 4), "FREQ=WEEKLY;INTERVAL=2;BYDAY=TU,TH", 5);
        assert_eq!(
            got,
            vec![
                date(2025, 3, 4),
                date(2025, 3, 6),
                date(2025, 3, 18),
                date(2025, 3, 20),
                date(2025, 4, 1),
            ]
        );
    }

    #[test]
    fn test_weekly_anchor_on_sunday_with_interval() {
        // Sunday is the last day of the ISO week; the next active week is
        // two weeks after the anchor's week.
        let got = series(date(2025, 3, 9), "FREQ=WEEKLY;INTERVAL=2;BYDAY=MO,SU", 4);
        assert_eq!(
            got,
            vec![date(2025, 3, 9), date(2025, 3, 17), date(2025, 3, 23), date(2025, 3, 31)]
        );
    }

    #[test]
    fn test_weekly_huge_interval_is_bounded() {
        let got = series(date(2025, 3, 3), "FREQ=WEEKLY;INTERVAL=1000;BYDAY=MO", 2);
        assert_eq!(got, vec![date(2025, 3, 3), date(2025, 3, 3) + Duration::weeks(1000)]);
    }

    #[test]
    fn test_anchor_emitted_even_when_not_matching() {
        // Saturday anchor on a weekdays series
        let got = series(date(2025, 3, 8), "FREQ=WEEKLY;BYDAY=MO,TU,WE,TH,FR", 3);
        assert_eq!(got, vec![date(2025, 3, 8), date(2025, 3, 10), date(2025, 3, 11)]);
    }

    #[test]
    fn test_monthly_day_clamps_short_months() {
        let got = series(date(2025, 1, 31), "FREQ=MONTHLY;BYMONTHDAY=31", 4);
        assert_eq!(
            got,
            vec![date(2025, 1, 31), date(2025, 2, 28), date(2025, 3, 31), date(2025, 4, 30)]
        );
    }

    #[test]
    fn test_monthly_day_steps_from_anchor_month() {
        // The 15th of the anchor's own month is not part of the series
        let got = series(date(2025, 3, 5), "FREQ=MONTHLY;BYMONTHDAY=15", 3);
        assert_eq!(got, vec![date(2025, 3, 5), date(2025, 4, 15), date(2025, 5, 15)]);

        let got = series(date(2025, 3, 5), "FREQ=MONTHLY;INTERVAL=2;BYMONTHDAY=15", 3);
        assert_eq!(got, vec![date(2025, 3, 5), date(2025, 5, 15), date(2025, 7, 15)]);
    }

    #[test]
    fn test_monthly_set_position_steps_from_anchor_month() {
        // Last Friday of March 2025 (the 28th) comes after the anchor
        let got = series(date(2025, 3, 3), "FREQ=MONTHLY;BYDAY=FR;BYSETPOS=-1", 3);
        assert_eq!(got, vec![date(2025, 3, 3), date(2025, 4, 25), date(2025, 5, 30)]);
    }

    #[test]
    fn test_monthly_anchor_day_without_byfields() {
        let got = series(date(2025, 1, 30), "FREQ=MONTHLY;INTERVAL=1", 3);
        assert_eq!(got, vec![date(2025, 1, 30), date(2025, 2, 28), date(2025, 3, 30)]);
    }

    #[test]
    fn test_monthly_last_friday() {
        let got = series(date(2025, 1, 31), "FREQ=MONTHLY;BYDAY=FR;BYSETPOS=-1", 4);
        assert_eq!(
            got,
            vec![date(2025, 1, 31), date(2025, 2, 28), date(2025, 3, 28), date(2025, 4, 25)]
        );
    }

    #[test]
    fn test_monthly_fifth_monday_skips_months() {
        // Months of 2025 with five Mondays: Mar, Jun, Sep, Dec
        let got = series(date(2025, 3, 31), "FREQ=MONTHLY;BYDAY=MO;BYSETPOS=5", 3);
        assert_eq!(got, vec![date(2025, 3, 31), date(2025, 6, 30), date(2025, 9, 29)]);
    }

    #[test]
    fn test_monthly_interval_nth_weekday() {
        // Second Tuesday every three months
        let got = series(date(2025, 1, 14), "FREQ=MONTHLY;INTERVAL=3;BYDAY=TU;BYSETPOS=2", 3);
        assert_eq!(got, vec![date(2025, 1, 14), date(2025, 4, 8), date(2025, 7, 8)]);
    }

    #[test]
    fn test_yearly_leap_day_clamps() {
        let got = series(date(2024, 2, 29), "FREQ=YEARLY", 3);
        assert_eq!(got, vec![date(2024, 2, 29), date(2025, 2, 28), date(2026, 2, 28)]);
    }

    #[test]
    fn test_max_steps_caps_series() {
        let config = RecurrenceConfig::new(Frequency::Daily);
        let got: Vec<_> = Occurrences::new(date(2025, 1, 1), &config, 5).collect();
        assert_eq!(got.len(), 5);
    }

    #[test]
    fn test_date_overflow_terminates() {
        let config = RecurrenceConfig::new(Frequency::Yearly).with_interval(u32::MAX);
        let got: Vec<_> = Occurrences::new(date(2025, 1, 1), &config, 100).collect();
        assert_eq!(got, vec![date(2025, 1, 1)]);
    }

    #[test]
    fn test_seek_lands_on_first_date_in_window() {
        let config = rule_to_config("FREQ=DAILY;INTERVAL=7").unwrap();
        let mut it = Occurrences::new(date(2020, 1, 1), &config, 10);
        it.seek(date(2025, 3, 1));
        // 2020-01-01 + 1890 days = 2025-03-05
        assert_eq!(it.next(), Some(date(2025, 3, 5)));
    }

    #[test]
    fn test_seek_monthly_set_position() {
        let config = rule_to_config("FREQ=MONTHLY;BYDAY=FR;BYSETPOS=-1").unwrap();
        let mut it = Occurrences::new(date(2020, 1, 31), &config, 10);
        it.seek(date(2025, 3, 1));
        assert_eq!(it.next(), Some(date(2025, 3, 28)));
    }

    #[test]
    fn test_seek_counted_reports_skipped_dates() {
        let config = rule_to_config("FREQ=DAILY;INTERVAL=7").unwrap();
        let mut it = Occurrences::new(date(2020, 1, 1), &config, 10);
        // Dates 0..=269 fall before Mar 5 2025
        assert_eq!(it.seek_counted(date(2025, 3, 1)), Some(270));
        assert_eq!(it.next(), Some(date(2025, 3, 5)));

        let mut it = Occurrences::new(date(2025, 3, 1), &config, 10);
        assert_eq!(it.seek_counted(date(2025, 3, 1)), Some(0));
        assert_eq!(it.next(), Some(date(2025, 3, 1)));
    }

    #[test]
    fn test_seek_counted_declines_walked_series() {
        let config = rule_to_config("FREQ=WEEKLY;BYDAY=MO,WE").unwrap();
        let mut it = Occurrences::new(date(2025, 3, 3), &config, 10);
        assert_eq!(it.seek_counted(date(2025, 6, 1)), None);
        assert_eq!(it.next(), Some(date(2025, 3, 3)));
    }

    #[test]
    fn test_weekly_series_at_end_of_calendar() {
        let anchor = NaiveDate::MAX.checked_sub_days(Days::new(3)).unwrap();
        let got = series(anchor, "FREQ=WEEKLY;BYDAY=MO,TU,WE,TH,FR,SA,SU", 10);
        assert_eq!(got.first(), Some(&anchor));
        assert!(got.len() <= 4);
        assert!(got.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_contains() {
        let config = rule_to_config("FREQ=WEEKLY;INTERVAL=2;BYDAY=TU,TH").unwrap();
        let it = Occurrences::new(date(2025, 3, 4), &config, DEFAULT_MAX_ITERATIONS);
        assert!(it.contains(date(2025, 3, 4)));
        assert!(it.contains(date(2025, 3, 20)));
        assert!(!it.contains(date(2025, 3, 11)));
        assert!(!it.contains(date(2025, 3, 1)));
    }

    // ── expand tests ────────────────────────────────────────────────────

    #[test]
    fn test_expand_daily_week() {
        let mut plan = plan_with("2025-03-01T09:00:00Z", "2025-03-01T10:00:00Z");
        plan.recurrence_type = Some(RecurrenceType::Daily);
        let got = expand(
            &plan,
            &window(date(2025, 3, 1), date(2025, 3, 7)),
            &ExpansionOptions::default(),
        );
        assert_eq!(got.len(), 7);
        assert!(got.iter().all(|o| o.start_time == NaiveTime::from_hms_opt(9, 0, 0).unwrap()));
        assert!(got.iter().all(|o| o.end_time == NaiveTime::from_hms_opt(10, 0, 0).unwrap()));
        assert!(got.iter().all(|o| o.plan_id == "plan-1" && !o.is_exception));
    }

    #[test]
    fn test_expand_window_start_is_inclusive() {
        let mut plan = plan_with("2025-03-01T09:00:00Z", "2025-03-01T10:00:00Z");
        plan.recurrence_rule = Some("FREQ=DAILY;INTERVAL=2".to_string());
        let got = expand(
            &plan,
            &window(date(2025, 3, 5), date(2025, 3, 9)),
            &ExpansionOptions::default(),
        );
        assert_eq!(dates(&got), vec![date(2025, 3, 5), date(2025, 3, 7), date(2025, 3, 9)]);
    }

    #[test]
    fn test_expand_without_anchor_is_empty() {
        let mut plan = Plan::new("p", "No anchor");
        plan.recurrence_type = Some(RecurrenceType::Daily);
        let got = expand(
            &plan,
            &window(date(2025, 3, 1), date(2025, 3, 7)),
            &ExpansionOptions::default(),
        );
        assert!(got.is_empty());
    }

    #[test]
    fn test_expand_non_recurring_is_empty() {
        let plan = plan_with("2025-03-01T09:00:00Z", "2025-03-01T10:00:00Z");
        let got = expand(
            &plan,
            &window(date(2025, 3, 1), date(2025, 3, 7)),
            &ExpansionOptions::default(),
        );
        assert!(got.is_empty());
    }

    #[test]
    fn test_expand_window_before_anchor_is_empty() {
        let mut plan = plan_with("2025-03-10T09:00:00Z", "2025-03-10T10:00:00Z");
        plan.recurrence_type = Some(RecurrenceType::Daily);
        let got = expand(
            &plan,
            &window(date(2025, 3, 1), date(2025, 3, 7)),
            &ExpansionOptions::default(),
        );
        assert!(got.is_empty());
    }

    #[test]
    fn test_expand_recurrence_end_date_caps() {
        let mut plan = plan_with("2025-03-01T09:00:00Z", "2025-03-01T10:00:00Z");
        plan.recurrence_type = Some(RecurrenceType::Daily);
        plan.recurrence_end_date = Some(date(2025, 3, 3));
        let got = expand(
            &plan,
            &window(date(2025, 3, 1), date(2025, 3, 7)),
            &ExpansionOptions::default(),
        );
        assert_eq!(dates(&got), vec![date(2025, 3, 1), date(2025, 3, 2), date(2025, 3, 3)]);
    }

    #[test]
    fn test_expand_until_caps() {
        let mut plan = plan_with("2025-03-01T09:00:00Z", "2025-03-01T10:00:00Z");
        plan.recurrence_rule = Some("FREQ=DAILY;UNTIL=20250302".to_string());
        let got = expand(
            &plan,
            &window(date(2025, 3, 1), date(2025, 3, 7)),
            &ExpansionOptions::default(),
        );
        assert_eq!(dates(&got), vec![date(2025, 3, 1), date(2025, 3, 2)]);
    }

    #[test]
    fn test_expand_count_is_counted_from_series_start() {
        // Five occurrences Mar 1..=Mar 5; the window only sees the last two
        let mut plan = plan_with("2025-03-01T09:00:00Z", "2025-03-01T10:00:00Z");
        plan.recurrence_rule = Some("FREQ=DAILY;COUNT=5".to_string());
        let got = expand(
            &plan,
            &window(date(2025, 3, 4), date(2025, 3, 10)),
            &ExpansionOptions::default(),
        );
        assert_eq!(dates(&got), vec![date(2025, 3, 4), date(2025, 3, 5)]);
    }

    #[test]
    fn test_expand_large_count_reaches_far_window() {
        // 1500 daily dates from Jan 1 2025 run through Feb 8 2029
        let mut plan = plan_with("2025-01-01T09:00:00Z", "2025-01-01T10:00:00Z");
        plan.recurrence_rule = Some("FREQ=DAILY;COUNT=1500".to_string());
        let options = ExpansionOptions::default();

        let got = expand(&plan, &window(date(2028, 1, 1), date(2028, 1, 7)), &options);
        assert_eq!(got.len(), 7);
        assert_eq!(got[0].date, date(2028, 1, 1));

        let got = expand(&plan, &window(date(2029, 2, 5), date(2029, 2, 12)), &options);
        assert_eq!(
            dates(&got),
            vec![date(2029, 2, 5), date(2029, 2, 6), date(2029, 2, 7), date(2029, 2, 8)]
        );
    }

    #[test]
    fn test_expand_far_window_not_hidden_by_cap() {
        let mut plan = plan_with("2015-01-01T09:00:00Z", "2015-01-01T10:00:00Z");
        plan.recurrence_type = Some(RecurrenceType::Daily);
        let got = expand(
            &plan,
            &window(date(2025, 3, 1), date(2025, 3, 7)),
            &ExpansionOptions::default(),
        );
        assert_eq!(got.len(), 7);
        assert_eq!(got[0].date, date(2025, 3, 1));
    }

    #[test]
    fn test_expand_uses_local_calendar() {
        // 02:00Z on Mar 3 is still Mar 2 in New York
        let mut plan = plan_with("2025-03-03T02:00:00Z", "2025-03-03T03:00:00Z");
        plan.recurrence_type = Some(RecurrenceType::Weekly);
        let options = ExpansionOptions {
            timezone: "America/New_York".parse().unwrap(),
            ..ExpansionOptions::default()
        };
        let got = expand(&plan, &window(date(2025, 3, 1), date(2025, 3, 16)), &options);
        assert_eq!(dates(&got), vec![date(2025, 3, 2), date(2025, 3, 9), date(2025, 3, 16)]);
        assert_eq!(got[0].start_time, NaiveTime::from_hms_opt(21, 0, 0).unwrap());
    }

    #[test]
    fn test_expand_respects_iteration_cap() {
        let mut plan = plan_with("2025-01-01T09:00:00Z", "2025-01-01T10:00:00Z");
        plan.recurrence_type = Some(RecurrenceType::Daily);
        let options = ExpansionOptions {
            max_iterations: 10,
            ..ExpansionOptions::default()
        };
        let got = expand(&plan, &window(date(2025, 1, 1), date(2025, 12, 31)), &options);
        assert_eq!(got.len(), 10);
    }

    #[test]
    fn test_expand_count_with_weekdays() {
        let mut plan = plan_with("2025-03-03T09:00:00Z", "2025-03-03T10:00:00Z");
        plan.recurrence_rule = Some("FREQ=WEEKLY;BYDAY=MO,WE;COUNT=3".to_string());
        let got = expand(
            &plan,
            &window(date(2025, 3, 1), date(2025, 3, 31)),
            &ExpansionOptions::default(),
        );
        assert_eq!(dates(&got), vec![date(2025, 3, 3), date(2025, 3, 5), date(2025, 3, 10)]);
        assert_eq!(
            rule_to_config("FREQ=WEEKLY;BYDAY=MO,WE;COUNT=3").unwrap().end,
            RecurrenceEnd::Count(3)
        );
    }

    #[test]
    fn test_anchor_end_before_start_collapses() {
        let plan = plan_with("2025-03-01T09:00:00Z", "2025-03-01T08:00:00Z");
        let anchor = Anchor::of(&plan, &Tz::UTC).unwrap();
        assert_eq!(anchor.duration, Duration::zero());
        assert_eq!(anchor.end_time, anchor.start_time);
    }

    // ── Window tests ────────────────────────────────────────────────────

    #[test]
    fn test_window_rejects_inverted_range() {
        let err = DateWindow::new(date(2025, 3, 7), date(2025, 3, 1))
            .unwrap_err()
            .to_string();
        assert!(err.contains("Invalid window"), "got: {err}");
    }

    #[test]
    fn test_window_from_instants() {
        let ny: Tz = "America/New_York".parse().unwrap();
        let w = DateWindow::from_instants(
            &"2025-03-01T03:00:00Z".parse().unwrap(),
            &"2025-03-08T03:00:00Z".parse().unwrap(),
            &ny,
        )
        .unwrap();
        assert_eq!(w, window(date(2025, 2, 28), date(2025, 3, 7)));
        assert!(w.contains(date(2025, 2, 28)));
        assert!(!w.contains(date(2025, 3, 8)));
    }

    #[test]
    fn test_occurrence_json_shape() {
        let plan = plan_with("2025-03-01T09:05:00Z", "2025-03-01T10:00:00Z");
        let anchor = Anchor::of(&plan, &Tz::UTC).unwrap();
        let json = serde_json::to_value(anchor.occurrence("plan-1", date(2025, 3, 2))).unwrap();
        assert_eq!(json["date"], "2025-03-02");
        assert_eq!(json["startTime"], "09:05");
        assert_eq!(json["endTime"], "10:00");
        assert_eq!(json["planId"], "plan-1");
        assert_eq!(json["isException"], false);
        assert!(json.get("exceptionType").is_none());
        assert!(json.get("overrides").is_none());
    }
}
