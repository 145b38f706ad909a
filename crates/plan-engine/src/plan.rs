//! The recurrence-relevant view of a stored plan.
//!
//! A plan carries its recurrence in one of two forms: a rule string
//! (`recurrence_rule`, preferred) or a legacy shorthand (`recurrence_type`)
//! that is expanded into a config seeded from the anchor date.

use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::PlanError;
use crate::rule::{rule_to_config, Frequency, RecurrenceConfig};

/// Legacy recurrence shorthand stored on older plans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceType {
    None,
    Daily,
    Weekly,
    Weekdays,
    Monthly,
    Yearly,
}

impl RecurrenceType {
    /// Expand the shorthand into a full config, seeded from the anchor date.
    ///
    /// `weekly` repeats on the anchor's weekday, `monthly` on the anchor's
    /// day-of-month, and `weekdays` is weekly on Monday through Friday.
    pub fn to_config(self, anchor: NaiveDate) -> Option<RecurrenceConfig> {
        match self {
            RecurrenceType::None => None,
            RecurrenceType::Daily => Some(RecurrenceConfig::new(Frequency::Daily)),
            RecurrenceType::Weekly => {
                Some(RecurrenceConfig::new(Frequency::Weekly).with_weekdays([anchor.weekday()]))
            }
            RecurrenceType::Weekdays => Some(RecurrenceConfig::new(Frequency::Weekly).with_weekdays([
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ])),
            RecurrenceType::Monthly => {
                Some(RecurrenceConfig::new(Frequency::Monthly).with_month_day(anchor.day()))
            }
            RecurrenceType::Yearly => Some(RecurrenceConfig::new(Frequency::Yearly)),
        }
    }
}

impl FromStr for RecurrenceType {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(RecurrenceType::None),
            "daily" => Ok(RecurrenceType::Daily),
            "weekly" => Ok(RecurrenceType::Weekly),
            "weekdays" => Ok(RecurrenceType::Weekdays),
            "monthly" => Ok(RecurrenceType::Monthly),
            "yearly" => Ok(RecurrenceType::Yearly),
            other => Err(PlanError::InvalidRule(format!(
                "unknown recurrence type '{other}'"
            ))),
        }
    }
}

/// Reads `recurrence_type`, treating an unknown shorthand as absent so one
/// bad record does not reject the whole payload.
fn lenient_recurrence_type<'de, D>(deserializer: D) -> Result<Option<RecurrenceType>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    match raw.parse() {
        Ok(recurrence_type) => Ok(Some(recurrence_type)),
        Err(err) => {
            tracing::warn!(value = %raw, error = %err, "ignoring recurrence_type");
            Ok(None)
        }
    }
}

/// A plan record as delivered by the planner API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_recurrence_type")]
    pub recurrence_type: Option<RecurrenceType>,
    #[serde(default)]
    pub recurrence_rule: Option<String>,
    /// Caps expansion regardless of the rule's own end condition.
    #[serde(default)]
    pub recurrence_end_date: Option<NaiveDate>,
    #[serde(rename = "tagIds", default)]
    pub tag_ids: Vec<String>,
}

impl Plan {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Plan {
            id: id.into(),
            title: title.into(),
            description: None,
            status: None,
            start_time: None,
            end_time: None,
            recurrence_type: None,
            recurrence_rule: None,
            recurrence_end_date: None,
            tag_ids: Vec::new(),
        }
    }

    /// True when the plan carries a rule string or a shorthand other than
    /// `none`. A recurring plan without an anchor still counts as recurring;
    /// it simply expands to nothing.
    pub fn is_recurring(&self) -> bool {
        self.recurrence_rule.is_some()
            || matches!(self.recurrence_type, Some(t) if t != RecurrenceType::None)
    }

    /// Resolve the effective recurrence config for a plan anchored on
    /// `anchor`.
    ///
    /// The rule string wins when it parses. A rule that fails to parse falls
    /// back to the shorthand, then to [`RecurrenceConfig::default`]; a plan
    /// with neither form has no config.
    pub fn recurrence_config(&self, anchor: NaiveDate) -> Option<RecurrenceConfig> {
        let shorthand = self.recurrence_type.and_then(|t| t.to_config(anchor));
        let Some(rule) = self.recurrence_rule.as_deref() else {
            return shorthand;
        };
        match rule_to_config(rule) {
            Ok(config) => Some(config),
            Err(err) => {
                tracing::warn!(
                    plan_id = %self.id,
                    rule,
                    error = %err,
                    fallback = if shorthand.is_some() { "shorthand" } else { "default" },
                    "stored recurrence rule is invalid"
                );
                Some(shorthand.unwrap_or_default())
            }
        }
    }
}
