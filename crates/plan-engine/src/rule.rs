//! Rule codec: [`RecurrenceConfig`] ⇄ compact rule string ⇄ readable phrase.
//!
//! The rule string is a deliberate subset of the RFC 5545 `RRULE` grammar:
//! `KEY=VALUE` pairs joined by `;`, with keys drawn from `FREQ`, `INTERVAL`,
//! `BYDAY`, `BYMONTHDAY`, `BYSETPOS`, `UNTIL` and `COUNT`.
//!
//! # Functions
//!
//! - [`config_to_rule`] — Serialize a config with a fixed token order
//! - [`rule_to_config`] — Parse a rule string, failing only on a bad `FREQ`
//! - [`rule_to_config_or_default`] — Parse, falling back to the safe default
//! - [`config_to_readable`] — Render a short localized phrase
//!
//! # Round-trip law
//!
//! For every config the planner UI can produce, decoding the encoded rule
//! yields the same config. Configs outside that set (e.g. a weekly config
//! carrying `byMonthDay`) normalize on the way through.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::dates::{parse_compact_date, weekday_from_index, weekday_index};
use crate::error::PlanError;

// ── Config types ────────────────────────────────────────────────────────────

/// How often a series repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    fn rule_token(self) -> &'static str {
        match self {
            Frequency::Daily => "DAILY",
            Frequency::Weekly => "WEEKLY",
            Frequency::Monthly => "MONTHLY",
            Frequency::Yearly => "YEARLY",
        }
    }

    fn from_rule_token(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DAILY" => Some(Frequency::Daily),
            "WEEKLY" => Some(Frequency::Weekly),
            "MONTHLY" => Some(Frequency::Monthly),
            "YEARLY" => Some(Frequency::Yearly),
            _ => None,
        }
    }
}

/// When a series stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecurrenceEnd {
    #[default]
    Never,
    /// Last permitted occurrence date (inclusive).
    Until(NaiveDate),
    /// Total number of occurrences in the series, counted from the anchor.
    Count(u32),
}

/// Structured recurrence definition.
///
/// Serializes with the planner's wire names (`byWeekday` as Sunday-based
/// indices, `endType`/`endDate`/`count` for the end condition).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RecurrenceConfigRepr", into = "RecurrenceConfigRepr")]
pub struct RecurrenceConfig {
    pub frequency: Frequency,
    /// Repeat every N units of `frequency`. Always at least 1.
    pub interval: u32,
    /// Weekdays, sorted Monday-first without duplicates.
    pub by_weekday: Vec<Weekday>,
    pub by_month_day: Option<u32>,
    pub by_set_pos: Option<i32>,
    pub end: RecurrenceEnd,
}

/// How a monthly series picks its day within each month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonthlyPattern {
    /// Fixed day-of-month, clamped to the month's length.
    DayOfMonth(u32),
    /// The `position`-th day among those matching `weekdays` (-1 = last).
    SetPosition { weekdays: Vec<Weekday>, position: i32 },
    /// Neither was given: repeat the anchor's own day-of-month.
    AnchorDay,
}

impl Default for RecurrenceConfig {
    /// The safe fallback: daily, every day, never ending.
    fn default() -> Self {
        RecurrenceConfig::new(Frequency::Daily)
    }
}

impl RecurrenceConfig {
    pub fn new(frequency: Frequency) -> Self {
        RecurrenceConfig {
            frequency,
            interval: 1,
            by_weekday: Vec::new(),
            by_month_day: None,
            by_set_pos: None,
            end: RecurrenceEnd::Never,
        }
    }

    pub fn with_interval(self, interval: u32) -> Self {
        RecurrenceConfig {
            interval: interval.max(1),
            ..self
        }
    }

    pub fn with_weekdays(self, weekdays: impl IntoIterator<Item = Weekday>) -> Self {
        RecurrenceConfig {
            by_weekday: normalize_weekdays(weekdays),
            ..self
        }
    }

    pub fn with_month_day(self, day: u32) -> Self {
        RecurrenceConfig {
            by_month_day: Some(day),
            by_set_pos: None,
            ..self
        }
    }

    pub fn with_set_pos(self, position: i32) -> Self {
        RecurrenceConfig {
            by_set_pos: Some(position),
            by_month_day: None,
            ..self
        }
    }

    pub fn with_end(self, end: RecurrenceEnd) -> Self {
        RecurrenceConfig { end, ..self }
    }

    /// Interpret the monthly fields. `bySetPos` only counts when paired with
    /// at least one weekday; otherwise `byMonthDay` wins, then the anchor day.
    pub fn monthly_pattern(&self) -> MonthlyPattern {
        match (self.by_set_pos, self.by_month_day) {
            (Some(position), _) if position != 0 && !self.by_weekday.is_empty() => {
                MonthlyPattern::SetPosition {
                    weekdays: self.by_weekday.clone(),
                    position,
                }
            }
            (_, Some(day)) => MonthlyPattern::DayOfMonth(day),
            _ => MonthlyPattern::AnchorDay,
        }
    }

    /// The series-wide occurrence cap, if any.
    pub fn count(&self) -> Option<u32> {
        match self.end {
            RecurrenceEnd::Count(n) => Some(n),
            _ => None,
        }
    }

    /// The last permitted date, if the series ends on a date.
    pub fn until(&self) -> Option<NaiveDate> {
        match self.end {
            RecurrenceEnd::Until(d) => Some(d),
            _ => None,
        }
    }
}

/// Sort weekdays Monday-first and drop duplicates.
fn normalize_weekdays(weekdays: impl IntoIterator<Item = Weekday>) -> Vec<Weekday> {
    let mut days: Vec<Weekday> = weekdays.into_iter().collect();
    days.sort_by_key(|d| d.num_days_from_monday());
    days.dedup();
    days
}

// ── Wire representation ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum EndType {
    Never,
    Until,
    Count,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecurrenceConfigRepr {
    frequency: Frequency,
    #[serde(default = "default_interval")]
    interval: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    by_weekday: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    by_month_day: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    by_set_pos: Option<i32>,
    #[serde(default = "default_end_type")]
    end_type: EndType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    count: Option<u32>,
}

fn default_interval() -> u32 {
    1
}

fn default_end_type() -> EndType {
    EndType::Never
}

impl From<RecurrenceConfigRepr> for RecurrenceConfig {
    fn from(repr: RecurrenceConfigRepr) -> Self {
        // An end type missing its companion field degrades to `never`.
        let end = match repr.end_type {
            EndType::Never => RecurrenceEnd::Never,
            EndType::Until => repr
                .end_date
                .map(RecurrenceEnd::Until)
                .unwrap_or(RecurrenceEnd::Never),
            EndType::Count => repr
                .count
                .filter(|n| *n > 0)
                .map(RecurrenceEnd::Count)
                .unwrap_or(RecurrenceEnd::Never),
        };
        RecurrenceConfig {
            frequency: repr.frequency,
            interval: repr.interval.max(1),
            by_weekday: normalize_weekdays(
                repr.by_weekday.into_iter().filter_map(weekday_from_index),
            ),
            by_month_day: repr.by_month_day,
            by_set_pos: repr.by_set_pos,
            end,
        }
    }
}

impl From<RecurrenceConfig> for RecurrenceConfigRepr {
    fn from(config: RecurrenceConfig) -> Self {
        let (end_type, end_date, count) = match config.end {
            RecurrenceEnd::Never => (EndType::Never, None, None),
            RecurrenceEnd::Until(d) => (EndType::Until, Some(d), None),
            RecurrenceEnd::Count(n) => (EndType::Count, None, Some(n)),
        };
        RecurrenceConfigRepr {
            frequency: config.frequency,
            interval: config.interval,
            by_weekday: config.by_weekday.into_iter().map(weekday_index).collect(),
            by_month_day: config.by_month_day,
            by_set_pos: config.by_set_pos,
            end_type,
            end_date,
            count,
        }
    }
}

// ── config_to_rule ──────────────────────────────────────────────────────────

/// Serialize a config into a rule string.
///
/// Token order is fixed: `FREQ`, `INTERVAL`, `BYDAY`, `BYMONTHDAY`/`BYSETPOS`,
/// `UNTIL`/`COUNT`. `INTERVAL` is omitted when it is 1, and `BY*` fields that
/// do not apply to the frequency are left out.
///
/// # Examples
///
/// ```
/// use chrono::Weekday;
/// use plan_engine::rule::{config_to_rule, Frequency, RecurrenceConfig};
///
/// let config = RecurrenceConfig::new(Frequency::Weekly)
///     .with_interval(2)
///     .with_weekdays([Weekday::Fri, Weekday::Mon, Weekday::Wed]);
/// assert_eq!(config_to_rule(&config), "FREQ=WEEKLY;INTERVAL=2;BYDAY=MO,WE,FR");
/// ```
pub fn config_to_rule(config: &RecurrenceConfig) -> String {
    let mut parts = vec![format!("FREQ={}", config.frequency.rule_token())];

    if config.interval > 1 {
        parts.push(format!("INTERVAL={}", config.interval));
    }

    match config.frequency {
        Frequency::Weekly => {
            if !config.by_weekday.is_empty() {
                parts.push(format!("BYDAY={}", join_weekday_codes(&config.by_weekday)));
            }
        }
        Frequency::Monthly => match config.monthly_pattern() {
            MonthlyPattern::SetPosition { weekdays, position } => {
                parts.push(format!("BYDAY={}", join_weekday_codes(&weekdays)));
                parts.push(format!("BYSETPOS={position}"));
            }
            MonthlyPattern::DayOfMonth(day) => parts.push(format!("BYMONTHDAY={day}")),
            MonthlyPattern::AnchorDay => {}
        },
        Frequency::Daily | Frequency::Yearly => {}
    }

    match config.end {
        RecurrenceEnd::Never => {}
        RecurrenceEnd::Until(date) => parts.push(format!("UNTIL={}", date.format("%Y%m%d"))),
        RecurrenceEnd::Count(n) => parts.push(format!("COUNT={n}")),
    }

    parts.join(";")
}

fn weekday_code(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
        Weekday::Sun => "SU",
    }
}

fn join_weekday_codes(weekdays: &[Weekday]) -> String {
    normalize_weekdays(weekdays.iter().copied())
        .into_iter()
        .map(weekday_code)
        .collect::<Vec<_>>()
        .join(",")
}

// ── rule_to_config ──────────────────────────────────────────────────────────

/// Parse a rule string into a config.
///
/// Pairs are `KEY=VALUE` separated by `;`; keys are case-insensitive and an
/// optional leading `RRULE:` is accepted. Unknown keys are ignored. Malformed
/// values degrade to their defaults: `INTERVAL` to 1, `COUNT`/`UNTIL` to a
/// series that never ends, `BY*` fields to unset. An ordinal-prefixed
/// `BYDAY` such as `-1FR` supplies `BYSETPOS` when none is given. If both
/// `UNTIL` and `COUNT` are present, `UNTIL` wins.
///
/// # Errors
///
/// Returns [`PlanError::InvalidRule`] if `FREQ` is missing or unrecognized.
///
/// # Examples
///
/// ```
/// use chrono::Weekday;
/// use plan_engine::rule::{rule_to_config, Frequency};
///
/// let config = rule_to_config("FREQ=MONTHLY;BYDAY=FR;BYSETPOS=-1").unwrap();
/// assert_eq!(config.frequency, Frequency::Monthly);
/// assert_eq!(config.by_weekday, vec![Weekday::Fri]);
/// assert_eq!(config.by_set_pos, Some(-1));
/// ```
pub fn rule_to_config(rule: &str) -> Result<RecurrenceConfig, PlanError> {
    let body = strip_rrule_prefix(rule.trim());

    let mut frequency = None;
    let mut interval = 1;
    let mut weekdays = Vec::new();
    let mut prefixed_position = None;
    let mut by_month_day = None;
    let mut by_set_pos = None;
    let mut until = None;
    let mut count = None;

    for pair in body.split(';') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        let value = value.trim();

        match key.trim().to_ascii_uppercase().as_str() {
            "FREQ" => {
                frequency = Some(Frequency::from_rule_token(value).ok_or_else(|| {
                    PlanError::InvalidRule(format!("unrecognized FREQ '{}'", value))
                })?);
            }
            "INTERVAL" => {
                interval = value.parse::<u32>().ok().filter(|n| *n > 0).unwrap_or(1);
            }
            "BYDAY" => {
                for token in value.split(',') {
                    if let Some((position, weekday)) = parse_byday_token(token) {
                        weekdays.push(weekday);
                        if prefixed_position.is_none() {
                            prefixed_position = position;
                        }
                    }
                }
            }
            "BYMONTHDAY" => {
                by_month_day = value
                    .split(',')
                    .filter_map(|v| v.trim().parse::<u32>().ok())
                    .find(|d| (1..=31).contains(d));
            }
            "BYSETPOS" => {
                by_set_pos = value
                    .split(',')
                    .filter_map(|v| v.trim().parse::<i32>().ok())
                    .find(|p| *p != 0);
            }
            "UNTIL" => until = parse_compact_date(value),
            "COUNT" => count = value.parse::<u32>().ok().filter(|n| *n > 0),
            _ => {}
        }
    }

    let frequency =
        frequency.ok_or_else(|| PlanError::InvalidRule(format!("missing FREQ in '{}'", rule)))?;

    let end = match (until, count) {
        (Some(date), _) => RecurrenceEnd::Until(date),
        (None, Some(n)) => RecurrenceEnd::Count(n),
        (None, None) => RecurrenceEnd::Never,
    };

    Ok(RecurrenceConfig {
        frequency,
        interval,
        by_weekday: normalize_weekdays(weekdays),
        by_month_day,
        by_set_pos: by_set_pos.or(prefixed_position),
        end,
    })
}

/// Parse a rule string, falling back to [`RecurrenceConfig::default`] (daily,
/// interval 1, never ending) when it cannot be parsed. Intended for live
/// rule-editing state where a half-typed rule must not abort rendering.
pub fn rule_to_config_or_default(rule: &str) -> RecurrenceConfig {
    rule_to_config(rule).unwrap_or_else(|err| {
        tracing::warn!(rule, error = %err, "falling back to default recurrence config");
        RecurrenceConfig::default()
    })
}

fn strip_rrule_prefix(s: &str) -> &str {
    match s.get(..6) {
        Some(prefix) if prefix.eq_ignore_ascii_case("RRULE:") => &s[6..],
        _ => s,
    }
}

/// Parse one `BYDAY` token: `FR`, `-1FR`, `+2MO`.
fn parse_byday_token(token: &str) -> Option<(Option<i32>, Weekday)> {
    let token = token.trim();
    if token.len() < 2 || !token.is_char_boundary(token.len() - 2) {
        return None;
    }
    let (prefix, code) = token.split_at(token.len() - 2);
    let weekday = match code.to_ascii_uppercase().as_str() {
        "MO" => Weekday::Mon,
        "TU" => Weekday::Tue,
        "WE" => Weekday::Wed,
        "TH" => Weekday::Thu,
        "FR" => Weekday::Fri,
        "SA" => Weekday::Sat,
        "SU" => Weekday::Sun,
        _ => return None,
    };
    let position = if prefix.is_empty() {
        None
    } else {
        Some(prefix.parse::<i32>().ok().filter(|p| *p != 0)?)
    };
    Some((position, weekday))
}

// ── config_to_readable ──────────────────────────────────────────────────────

/// Language of [`config_to_readable`] phrases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Es,
}

impl FromStr for Locale {
    type Err = PlanError;

    /// Accepts bare language codes and BCP 47 tags (`en`, `en-US`, `es_MX`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lang = s
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or("")
            .to_ascii_lowercase();
        match lang.as_str() {
            "en" => Ok(Locale::En),
            "es" => Ok(Locale::Es),
            _ => Err(PlanError::InvalidRule(format!("unsupported locale '{}'", s))),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::En => write!(f, "en"),
            Locale::Es => write!(f, "es"),
        }
    }
}

const WORKWEEK: [Weekday; 5] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
];

/// Render a short phrase describing `config`, e.g. `"every 2 weeks,
/// Mon/Wed/Fri"`, `"monthly, last Friday"`, `"daily, 10 occurrences"`.
///
/// Purely presentational: every config the codec can produce renders, and
/// the output is not meant to be parsed back.
pub fn config_to_readable(config: &RecurrenceConfig, locale: Locale) -> String {
    let interval = config.interval.max(1);
    let mut phrase = match config.frequency {
        Frequency::Weekly if interval == 1 && config.by_weekday == WORKWEEK => {
            every_weekday_phrase(locale).to_string()
        }
        frequency => frequency_phrase(locale, frequency, interval),
    };

    match config.frequency {
        Frequency::Weekly if !config.by_weekday.is_empty() && config.by_weekday != WORKWEEK => {
            let names: Vec<&str> = config
                .by_weekday
                .iter()
                .map(|d| weekday_short(locale, *d))
                .collect();
            phrase.push_str(&format!(", {}", names.join("/")));
        }
        Frequency::Weekly if !config.by_weekday.is_empty() && interval > 1 => {
            phrase.push_str(&format!(", {}", workweek_phrase(locale)));
        }
        Frequency::Monthly => match config.monthly_pattern() {
            MonthlyPattern::DayOfMonth(day) => {
                phrase.push_str(&format!(", {}", month_day_phrase(locale, day)));
            }
            MonthlyPattern::SetPosition { weekdays, position } => {
                let target = if weekdays == WORKWEEK {
                    match locale {
                        Locale::En => "weekday".to_string(),
                        Locale::Es => "día laborable".to_string(),
                    }
                } else if weekdays.len() == 1 {
                    weekday_long(locale, weekdays[0]).to_string()
                } else {
                    weekdays
                        .iter()
                        .map(|d| weekday_short(locale, *d))
                        .collect::<Vec<_>>()
                        .join("/")
                };
                phrase.push_str(&format!(", {}", set_position_phrase(locale, position, &target)));
            }
            MonthlyPattern::AnchorDay => {}
        },
        _ => {}
    }

    match config.end {
        RecurrenceEnd::Never => {}
        RecurrenceEnd::Until(date) => {
            let date = date.format("%Y-%m-%d");
            match locale {
                Locale::En => phrase.push_str(&format!(", until {date}")),
                Locale::Es => phrase.push_str(&format!(", hasta el {date}")),
            }
        }
        RecurrenceEnd::Count(n) => match locale {
            Locale::En => phrase.push_str(&format!(
                ", {} occurrence{}",
                n,
                if n == 1 { "" } else { "s" }
            )),
            Locale::Es => phrase.push_str(&format!(
                ", {} {}",
                n,
                if n == 1 { "repetición" } else { "repeticiones" }
            )),
        },
    }

    phrase
}

fn frequency_phrase(locale: Locale, frequency: Frequency, interval: u32) -> String {
    match (locale, interval) {
        (Locale::En, 1) => match frequency {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Yearly => "yearly",
        }
        .to_string(),
        (Locale::En, n) => {
            let unit = match frequency {
                Frequency::Daily => "days",
                Frequency::Weekly => "weeks",
                Frequency::Monthly => "months",
                Frequency::Yearly => "years",
            };
            format!("every {n} {unit}")
        }
        (Locale::Es, 1) => match frequency {
            Frequency::Daily => "diariamente",
            Frequency::Weekly => "semanalmente",
            Frequency::Monthly => "mensualmente",
            Frequency::Yearly => "anualmente",
        }
        .to_string(),
        (Locale::Es, n) => {
            let unit = match frequency {
                Frequency::Daily => "días",
                Frequency::Weekly => "semanas",
                Frequency::Monthly => "meses",
                Frequency::Yearly => "años",
            };
            format!("cada {n} {unit}")
        }
    }
}

fn every_weekday_phrase(locale: Locale) -> &'static str {
    match locale {
        Locale::En => "every weekday",
        Locale::Es => "todos los días laborables",
    }
}

fn workweek_phrase(locale: Locale) -> &'static str {
    match locale {
        Locale::En => "weekdays",
        Locale::Es => "días laborables",
    }
}

fn month_day_phrase(locale: Locale, day: u32) -> String {
    match locale {
        Locale::En => format!("on day {day}"),
        Locale::Es => format!("el día {day}"),
    }
}

fn set_position_phrase(locale: Locale, position: i32, target: &str) -> String {
    match locale {
        Locale::En => {
            let ordinal = match position {
                -1 => "last".to_string(),
                -2 => "second to last".to_string(),
                1 => "first".to_string(),
                2 => "second".to_string(),
                3 => "third".to_string(),
                4 => "fourth".to_string(),
                5 => "fifth".to_string(),
                n if n < 0 => format!("{} from last", english_ordinal(n.unsigned_abs())),
                n => english_ordinal(n.unsigned_abs()),
            };
            format!("{ordinal} {target}")
        }
        Locale::Es => {
            let ordinal = match position {
                -1 => "último".to_string(),
                -2 => "penúltimo".to_string(),
                1 => "primer".to_string(),
                2 => "segundo".to_string(),
                3 => "tercer".to_string(),
                4 => "cuarto".to_string(),
                5 => "quinto".to_string(),
                n if n < 0 => format!("{}.º desde el final", n.unsigned_abs()),
                n => format!("{n}.º"),
            };
            format!("el {ordinal} {target}")
        }
    }
}

/// `1st`, `2nd`, `3rd`, `4th`, `11th`, `21st`, ...
fn english_ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

fn weekday_short(locale: Locale, weekday: Weekday) -> &'static str {
    match (locale, weekday) {
        (Locale::En, Weekday::Mon) => "Mon",
        (Locale::En, Weekday::Tue) => "Tue",
        (Locale::En, Weekday::Wed) => "Wed",
        (Locale::En, Weekday::Thu) => "Thu",
        (Locale::En, Weekday::Fri) => "Fri",
        (Locale::En, Weekday::Sat) => "Sat",
        (Locale::En, Weekday::Sun) => "Sun",
        (Locale::Es, Weekday::Mon) => "lun",
        (Locale::Es, Weekday::Tue) => "mar",
        (Locale::Es, Weekday::Wed) => "mié",
        (Locale::Es, Weekday::Thu) => "jue",
        (Locale::Es, Weekday::Fri) => "vie",
        (Locale::Es, Weekday::Sat) => "sáb",
        (Locale::Es, Weekday::Sun) => "dom",
    }
}

fn weekday_long(locale: Locale, weekday: Weekday) -> &'static str {
    match (locale, weekday) {
        (Locale::En, Weekday::Mon) => "Monday",
        (Locale::En, Weekday::Tue) => "Tuesday",
        (Locale::En, Weekday::Wed) => "Wednesday",
        (Locale::En, Weekday::Thu) => "Thursday",
        (Locale::En, Weekday::Fri) => "Friday",
        (Locale::En, Weekday::Sat) => "Saturday",
        (Locale::En, Weekday::Sun) => "Sunday",
        (Locale::Es, Weekday::Mon) => "lunes",
        (Locale::Es, Weekday::Tue) => "martes",
        (Locale::Es, Weekday::Wed) => "miércoles",
        (Locale::Es, Weekday::Thu) => "jueves",
        (Locale::Es, Weekday::Fri) => "viernes",
        (Locale::Es, Weekday::Sat) => "sábado",
        (Locale::Es, Weekday::Sun) => "domingo",
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
