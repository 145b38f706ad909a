//! Per-instance exception records.
//!
//! An exception is keyed by `(planId, instanceDate)` and changes how one
//! generated occurrence is presented: `cancelled` hides it, `modified`
//! annotates it with overrides, `moved` relocates it from `originalDate` to
//! `instanceDate`. The kind is a closed enum, so `originalDate` exists only
//! on moves.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Discriminant of [`ExceptionKind`], as exposed on occurrences and events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExceptionType {
    Modified,
    Cancelled,
    Moved,
}

/// Partial field map carried by `modified` and `moved` exceptions.
///
/// Overrides are carried, not applied: the view adapter decides precedence,
/// and an override always wins over the inherited plan field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, alias = "start_time", skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, alias = "end_time", skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
}

impl InstanceOverrides {
    pub fn is_empty(&self) -> bool {
        self == &InstanceOverrides::default()
    }

    pub fn with_title(self, title: impl Into<String>) -> Self {
        InstanceOverrides {
            title: Some(title.into()),
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "exceptionType", rename_all = "lowercase")]
pub enum ExceptionKind {
    Cancelled,
    Modified {
        #[serde(default)]
        overrides: InstanceOverrides,
    },
    /// The occurrence at `original_date` shows up at the record's
    /// `instance_date` instead.
    Moved {
        #[serde(rename = "originalDate")]
        original_date: NaiveDate,
        #[serde(default)]
        overrides: InstanceOverrides,
    },
}

impl ExceptionKind {
    pub fn exception_type(&self) -> ExceptionType {
        match self {
            ExceptionKind::Cancelled => ExceptionType::Cancelled,
            ExceptionKind::Modified { .. } => ExceptionType::Modified,
            ExceptionKind::Moved { .. } => ExceptionType::Moved,
        }
    }

    pub fn overrides(&self) -> Option<&InstanceOverrides> {
        match self {
            ExceptionKind::Cancelled => None,
            ExceptionKind::Modified { overrides } | ExceptionKind::Moved { overrides, .. } => {
                Some(overrides)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanInstanceException {
    pub plan_id: String,
    /// The occurrence this applies to; for moves, the destination date.
    pub instance_date: NaiveDate,
    #[serde(flatten)]
    pub kind: ExceptionKind,
}

impl PlanInstanceException {
    pub fn cancelled(plan_id: impl Into<String>, instance_date: NaiveDate) -> Self {
        PlanInstanceException {
            plan_id: plan_id.into(),
            instance_date,
            kind: ExceptionKind::Cancelled,
        }
    }

    pub fn modified(
        plan_id: impl Into<String>,
        instance_date: NaiveDate,
        overrides: InstanceOverrides,
    ) -> Self {
        PlanInstanceException {
            plan_id: plan_id.into(),
            instance_date,
            kind: ExceptionKind::Modified { overrides },
        }
    }

    pub fn moved(
        plan_id: impl Into<String>,
        original_date: NaiveDate,
        destination: NaiveDate,
        overrides: InstanceOverrides,
    ) -> Self {
        PlanInstanceException {
            plan_id: plan_id.into(),
            instance_date: destination,
            kind: ExceptionKind::Moved {
                original_date,
                overrides,
            },
        }
    }

    pub fn exception_type(&self) -> ExceptionType {
        self.kind.exception_type()
    }
}

/// Group a flat exception list by plan id, keeping each plan's records in
/// their original order.
pub fn group_by_plan(
    exceptions: impl IntoIterator<Item = PlanInstanceException>,
) -> HashMap<String, Vec<PlanInstanceException>> {
    let mut grouped: HashMap<String, Vec<PlanInstanceException>> = HashMap::new();
    for exception in exceptions {
        grouped
            .entry(exception.plan_id.clone())
            .or_default()
            .push(exception);
    }
    grouped
}

// ── ExceptionIndex ──────────────────────────────────────────────────────────

/// Date-keyed lookup over one plan's exceptions.
///
/// At most one exception exists per instance date; when the input violates
/// that, the later record wins.
#[derive(Debug, Clone, Default)]
pub struct ExceptionIndex<'a> {
    by_instance: BTreeMap<NaiveDate, &'a PlanInstanceException>,
    moved_from: BTreeSet<NaiveDate>,
}

impl<'a> ExceptionIndex<'a> {
    pub fn new(exceptions: &'a [PlanInstanceException]) -> Self {
        let mut by_instance = BTreeMap::new();
        for exception in exceptions {
            if let Some(previous) = by_instance.insert(exception.instance_date, exception) {
                tracing::warn!(
                    plan_id = %exception.plan_id,
                    instance_date = %exception.instance_date,
                    replaced = ?previous.exception_type(),
                    "duplicate exception for instance date, keeping the later one"
                );
            }
        }

        let moved_from = by_instance
            .values()
            .filter_map(|e| match e.kind {
                ExceptionKind::Moved { original_date, .. } => Some(original_date),
                _ => None,
            })
            .collect();

        ExceptionIndex {
            by_instance,
            moved_from,
        }
    }

    /// The exception recorded for `date`, if any.
    pub fn at(&self, date: NaiveDate) -> Option<&'a PlanInstanceException> {
        self.by_instance.get(&date).copied()
    }

    /// True when the occurrence at `date` was moved somewhere else.
    pub fn is_moved_away(&self, date: NaiveDate) -> bool {
        self.moved_from.contains(&date)
    }

    /// All `moved` records, ascending by destination date.
    pub fn moves(&self) -> impl Iterator<Item = &'a PlanInstanceException> + '_ {
        self.by_instance
            .values()
            .copied()
            .filter(|e| matches!(e.kind, ExceptionKind::Moved { .. }))
    }

    /// `cancelled` and `modified` records, ascending by instance date.
    pub fn in_place(&self) -> impl Iterator<Item = &'a PlanInstanceException> + '_ {
        self.by_instance
            .values()
            .copied()
            .filter(|e| !matches!(e.kind, ExceptionKind::Moved { .. }))
    }

    pub fn is_empty(&self) -> bool {
        self.by_instance.is_empty()
    }
}
