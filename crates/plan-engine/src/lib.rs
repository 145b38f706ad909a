//! # plan-engine
//!
//! Deterministic recurrence expansion for calendar plans.
//!
//! A plan carries a recurrence rule (or a legacy shorthand) and an anchor
//! start time. The engine turns that into concrete dated occurrences for a
//! visible window, applies per-instance exceptions, and maps the result onto
//! calendar view models. Everything is pure and synchronous: no I/O, no
//! system clock, no shared state.
//!
//! ## Modules
//!
//! - [`rule`] — `RecurrenceConfig` ⇄ rule string codec, readable phrases
//! - [`plan`] — plan records and recurrence config resolution
//! - [`expander`] — bounded occurrence iterator and windowed expansion
//! - [`exception`] — per-instance exception records
//! - [`overlay`] — applies cancelled/modified/moved exceptions
//! - [`calendar`] — calendar event view models
//! - [`dates`] — whole-day calendar arithmetic
//! - [`error`] — Error types

pub mod calendar;
pub mod dates;
pub mod error;
pub mod exception;
pub mod expander;
pub mod overlay;
pub mod plan;
pub mod rule;

pub use calendar::{
    plan_to_event, to_calendar_events, to_calendar_events_batch, CalendarEvent, ViewOptions,
};
pub use error::PlanError;
pub use exception::{
    group_by_plan, ExceptionKind, ExceptionType, InstanceOverrides, PlanInstanceException,
};
pub use expander::{
    expand, DateWindow, ExpandedOccurrence, ExpansionOptions, Occurrences, DEFAULT_MAX_ITERATIONS,
};
pub use overlay::{expand_with_exceptions, overlay};
pub use plan::{Plan, RecurrenceType};
pub use rule::{
    config_to_readable, config_to_rule, rule_to_config, rule_to_config_or_default, Frequency,
    Locale, RecurrenceConfig, RecurrenceEnd,
};
