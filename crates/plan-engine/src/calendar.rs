//! Calendar view models.
//!
//! Maps plans and their exceptions onto the flat event records a calendar
//! renderer consumes. A non-recurring plan becomes one event keyed by the
//! plan id; a recurring plan becomes one event per final occurrence, keyed
//! `{planId}_{YYYY-MM-DD}`.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::dates::{at_local, local_date, whole_minutes_between};
use crate::exception::{ExceptionType, PlanInstanceException};
use crate::expander::{Anchor, DateWindow, ExpandedOccurrence, ExpansionOptions};
use crate::overlay::expand_with_exceptions;
use crate::plan::Plan;

/// One renderable calendar entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub calendar_id: String,
    pub original_plan_id: String,
    /// Set on recurring instances only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_date: Option<NaiveDate>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Whole minutes from `start` to `end`, never negative.
    pub duration: i64,
    /// `start` and `end` fall on different local calendar days.
    pub is_multi_day: bool,
    pub is_recurring: bool,
    pub is_exception: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception_type: Option<ExceptionType>,
    pub tag_ids: Vec<String>,
}

/// Options for the view mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewOptions {
    /// Stand-in for missing start/end times on non-recurring plans.
    pub now: DateTime<Utc>,
    pub expansion: ExpansionOptions,
}

impl ViewOptions {
    pub fn new(now: DateTime<Utc>) -> Self {
        ViewOptions {
            now,
            expansion: ExpansionOptions::default(),
        }
    }

    pub fn with_timezone(self, timezone: Tz) -> Self {
        ViewOptions {
            expansion: ExpansionOptions {
                timezone,
                ..self.expansion
            },
            ..self
        }
    }

    pub fn with_max_iterations(self, max_iterations: usize) -> Self {
        ViewOptions {
            expansion: ExpansionOptions {
                max_iterations,
                ..self.expansion
            },
            ..self
        }
    }
}

fn is_multi_day(start: &DateTime<Utc>, end: &DateTime<Utc>, tz: &Tz) -> bool {
    local_date(start, tz) != local_date(end, tz)
}

/// Map a plan onto a single event, as stored.
///
/// Missing times fall back to `options.now`; `duration` is 0 unless both
/// times are present and ordered.
pub fn plan_to_event(plan: &Plan, options: &ViewOptions) -> CalendarEvent {
    let start = plan.start_time.unwrap_or(options.now);
    let end = plan.end_time.unwrap_or(options.now);
    let duration = match (&plan.start_time, &plan.end_time) {
        (Some(start), Some(end)) => whole_minutes_between(start, end),
        _ => 0,
    };

    CalendarEvent {
        id: plan.id.clone(),
        calendar_id: plan.id.clone(),
        original_plan_id: plan.id.clone(),
        instance_date: None,
        title: plan.title.clone(),
        description: plan.description.clone(),
        status: plan.status.clone(),
        start,
        end,
        duration,
        is_multi_day: is_multi_day(&start, &end, &options.expansion.timezone),
        is_recurring: plan.is_recurring(),
        is_exception: false,
        exception_type: None,
        tag_ids: plan.tag_ids.clone(),
    }
}

/// One recurring instance. Override fields win over the plan's; tags always
/// come from the plan.
fn instance_event(
    plan: &Plan,
    anchor: &Anchor,
    occurrence: ExpandedOccurrence,
    tz: &Tz,
) -> CalendarEvent {
    let overrides = occurrence.overrides;
    let start = overrides
        .start_time
        .unwrap_or_else(|| at_local(occurrence.date, occurrence.start_time, tz));
    let end = overrides
        .end_time
        .unwrap_or(start + anchor.duration)
        .max(start);

    CalendarEvent {
        id: format!("{}_{}", plan.id, occurrence.date.format("%Y-%m-%d")),
        calendar_id: plan.id.clone(),
        original_plan_id: plan.id.clone(),
        instance_date: Some(occurrence.date),
        title: overrides.title.unwrap_or_else(|| plan.title.clone()),
        description: overrides.description.or_else(|| plan.description.clone()),
        status: overrides.status.or_else(|| plan.status.clone()),
        start,
        end,
        duration: whole_minutes_between(&start, &end),
        is_multi_day: is_multi_day(&start, &end, tz),
        is_recurring: true,
        is_exception: occurrence.is_exception,
        exception_type: occurrence.exception_type,
        tag_ids: plan.tag_ids.clone(),
    }
}

/// Events for one plan inside `window`.
///
/// Non-recurring plans map to exactly one event regardless of the window.
/// Recurring plans are expanded, overlaid with
/// `exceptions_by_plan[plan.id]` and mapped in date order.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use plan_engine::calendar::{to_calendar_events, ViewOptions};
/// use plan_engine::expander::DateWindow;
/// use plan_engine::plan::{Plan, RecurrenceType};
///
/// let mut plan = Plan::new("p1", "Standup");
/// plan.start_time = Some("2025-03-01T09:00:00Z".parse().unwrap());
/// plan.end_time = Some("2025-03-01T09:15:00Z".parse().unwrap());
/// plan.recurrence_type = Some(RecurrenceType::Daily);
///
/// let window = DateWindow::parse("2025-03-01", "2025-03-03").unwrap();
/// let options = ViewOptions::new("2025-03-01T00:00:00Z".parse().unwrap());
/// let events = to_calendar_events(&plan, &window, &HashMap::new(), &options);
///
/// assert_eq!(events.len(), 3);
/// assert_eq!(events[0].id, "p1_2025-03-01");
/// assert_eq!(events[0].duration, 15);
/// ```
pub fn to_calendar_events(
    plan: &Plan,
    window: &DateWindow,
    exceptions_by_plan: &HashMap<String, Vec<PlanInstanceException>>,
    options: &ViewOptions,
) -> Vec<CalendarEvent> {
    if !plan.is_recurring() {
        return vec![plan_to_event(plan, options)];
    }

    let tz = &options.expansion.timezone;
    let Some(anchor) = Anchor::of(plan, tz) else {
        return Vec::new();
    };
    let exceptions = exceptions_by_plan
        .get(&plan.id)
        .map(Vec::as_slice)
        .unwrap_or_default();

    expand_with_exceptions(plan, window, exceptions, &options.expansion)
        .into_iter()
        .map(|occurrence| instance_event(plan, &anchor, occurrence, tz))
        .collect()
}

/// [`to_calendar_events`] over a mixed list of plans sharing one window.
/// Events are grouped by plan in input order.
pub fn to_calendar_events_batch(
    plans: &[Plan],
    window: &DateWindow,
    exceptions_by_plan: &HashMap<String, Vec<PlanInstanceException>>,
    options: &ViewOptions,
) -> Vec<CalendarEvent> {
    plans
        .iter()
        .flat_map(|plan| to_calendar_events(plan, window, exceptions_by_plan, options))
        .collect()
}
