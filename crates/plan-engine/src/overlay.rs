//! Exception overlay: raw occurrences + exceptions → final occurrences.
//!
//! The overlay is a pure fold keyed by date. Raw occurrences go in, each one
//! is kept, annotated or dropped according to the exception at its date, and
//! `moved` destinations are merged in afterwards. Output is ascending by date
//! with at most one occurrence per date.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::exception::{ExceptionIndex, ExceptionKind, ExceptionType, PlanInstanceException};
use crate::expander::{expand, Anchor, DateWindow, ExpandedOccurrence, ExpansionOptions};
use crate::plan::Plan;

/// Apply one plan's exceptions to its raw occurrences.
///
/// - `cancelled` drops the occurrence at `instance_date`.
/// - `modified` keeps it and carries the overrides.
/// - `moved` drops the occurrence at `original_date` and inserts one at the
///   destination when the destination is inside `window`. The destination
///   occurrence replaces any raw occurrence already on that date.
///
/// `cancelled` and `modified` records whose date has no raw occurrence are
/// ignored. `anchor` supplies the time-of-day for inserted occurrences.
pub fn overlay(
    raw: Vec<ExpandedOccurrence>,
    exceptions: &[PlanInstanceException],
    window: &DateWindow,
    anchor: &Anchor,
) -> Vec<ExpandedOccurrence> {
    if exceptions.is_empty() {
        return raw;
    }
    let index = ExceptionIndex::new(exceptions);
    let raw_dates: BTreeSet<NaiveDate> = raw.iter().map(|o| o.date).collect();

    let mut by_date: BTreeMap<NaiveDate, ExpandedOccurrence> = raw
        .into_iter()
        .filter(|o| !index.is_moved_away(o.date))
        .filter_map(|o| match index.at(o.date).map(|e| &e.kind) {
            None => Some(o),
            Some(ExceptionKind::Cancelled) => None,
            Some(ExceptionKind::Modified { overrides }) => Some(ExpandedOccurrence {
                is_exception: true,
                exception_type: Some(ExceptionType::Modified),
                overrides: overrides.clone(),
                ..o
            }),
            // Replaced by the move's destination below.
            Some(ExceptionKind::Moved { .. }) => None,
        })
        .map(|o| (o.date, o))
        .collect();

    for moved in index.moves().filter(|e| window.contains(e.instance_date)) {
        let occurrence = ExpandedOccurrence {
            is_exception: true,
            exception_type: Some(ExceptionType::Moved),
            overrides: moved.kind.overrides().cloned().unwrap_or_default(),
            ..anchor.occurrence(&moved.plan_id, moved.instance_date)
        };
        by_date.insert(moved.instance_date, occurrence);
    }

    for orphan in index
        .in_place()
        .filter(|e| !raw_dates.contains(&e.instance_date))
    {
        tracing::trace!(
            plan_id = %orphan.plan_id,
            instance_date = %orphan.instance_date,
            exception_type = ?orphan.exception_type(),
            "ignoring exception without a matching occurrence"
        );
    }

    by_date.into_values().collect()
}

/// [`expand`] followed by [`overlay`] for one plan and its own exceptions.
///
/// Non-recurring plans and plans without an anchor yield nothing, whatever
/// their exceptions say.
pub fn expand_with_exceptions(
    plan: &Plan,
    window: &DateWindow,
    exceptions: &[PlanInstanceException],
    options: &ExpansionOptions,
) -> Vec<ExpandedOccurrence> {
    if !plan.is_recurring() {
        return Vec::new();
    }
    let Some(anchor) = Anchor::of(plan, &options.timezone) else {
        return Vec::new();
    };
    let raw = expand(plan, window, options);
    overlay(raw, exceptions, window, &anchor)
}
