//! Rule-driven aggregation of work logs.
//!
//! This crate contains the engine that turns a flat list of time-tracked
//! log entries into per-group totals:
//! - Rules: field-matching predicates that classify logs
//! - Grouping: structured keys over task, comment and first matching rule
//! - Flattening: dependency trees counted into their parent's group
//! - Totals: per-group minutes and percentage shares of the grand total
//!
//! Ingestion of raw `[issue, comment, time]` rows lives in [`import`].

mod aggregate;
mod error;
mod flatten;
mod group;
pub mod import;
mod log;
mod percent;
mod rule;
mod total;
mod types;

pub use aggregate::{Bucket, aggregate};
pub use error::{CalcError, ImportError};
pub use flatten::{flatten, flattened_time};
pub use group::{
    GroupConfig, GroupKey, RuleSegment, UNGROUPED, UNMATCHED, first_matching_rule,
    normalize_comment, resolve_key,
};
pub use import::{import_rows, parse_duration};
pub use log::{DepLog, ImportLog, Log, LogDetail, LogEntry};
pub use percent::{compute_percents, percent_of};
pub use rule::{LogField, Rule, RuleAction, RuleError, matches};
pub use total::{GroupedLog, TotalCalc, build};
pub use types::{LogKey, RuleKey, ValidationError};
