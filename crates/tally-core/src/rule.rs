//! Declarative field-matching rules used to classify logs into groups.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CalcError;
use crate::group::{UNGROUPED, UNMATCHED};
use crate::log::LogEntry;
use crate::types::{RuleKey, ValidationError};

/// Log fields a rule can inspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LogField {
    Issue,
    Comment,
    Time,
}

impl LogField {
    /// Reads this field from a log as a string. Numeric fields are
    /// stringified in decimal.
    pub fn read<'a, L: LogEntry + ?Sized>(self, log: &'a L) -> Cow<'a, str> {
        match self {
            Self::Issue => Cow::Borrowed(log.issue()),
            Self::Comment => Cow::Borrowed(log.comment()),
            Self::Time => Cow::Owned(log.time().to_string()),
        }
    }
}

impl fmt::Display for LogField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Issue => "issue",
            Self::Comment => "comment",
            Self::Time => "time",
        };
        write!(f, "{s}")
    }
}

impl FromStr for LogField {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "issue" => Ok(Self::Issue),
            "comment" => Ok(Self::Comment),
            "time" => Ok(Self::Time),
            _ => Err(CalcError::InvalidField {
                field: s.to_string(),
            }),
        }
    }
}

impl Serialize for LogField {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for LogField {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// How a rule compares field values. Only containment exists today.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    /// The field's string contains one of the rule values.
    #[default]
    Includes,
}

/// A classification rule: a log matches when `field` contains any of
/// `values`.
///
/// Construction validates the rule, so matching itself cannot fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRule")]
pub struct Rule {
    pub action: RuleAction,
    pub field: LogField,
    pub values: BTreeSet<String>,
    pub key: RuleKey,
    pub name: String,
}

/// Unvalidated wire form of a [`Rule`].
#[derive(Deserialize)]
struct RawRule {
    #[serde(default)]
    action: RuleAction,
    field: String,
    values: Vec<String>,
    key: String,
    #[serde(default)]
    name: String,
}

/// Errors from constructing a rule.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error(transparent)]
    Field(#[from] CalcError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl TryFrom<RawRule> for Rule {
    type Error = RuleError;

    fn try_from(raw: RawRule) -> Result<Self, Self::Error> {
        let field = raw.field.parse::<LogField>()?;
        let mut rule = Self::new(field, raw.key, raw.name, raw.values)?;
        rule.action = raw.action;
        Ok(rule)
    }
}

impl Rule {
    /// Creates an `includes` rule.
    ///
    /// Empty values are dropped; a rule left with no values is rejected,
    /// since it could never match. The keys [`UNGROUPED`] and [`UNMATCHED`]
    /// are reserved for the sentinel buckets and rejected too.
    pub fn new(
        field: LogField,
        key: impl Into<String>,
        name: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self, ValidationError> {
        let key = RuleKey::new(key)?;
        if [UNGROUPED, UNMATCHED].contains(&key.as_str()) {
            return Err(ValidationError::InvalidRule {
                key: key.to_string(),
                reason: "key is reserved",
            });
        }
        let values: BTreeSet<String> = values
            .into_iter()
            .map(Into::into)
            .filter(|v| !v.is_empty())
            .collect();
        if values.is_empty() {
            return Err(ValidationError::InvalidRule {
                key: key.to_string(),
                reason: "no non-empty values",
            });
        }
        Ok(Self {
            action: RuleAction::Includes,
            field,
            values,
            key,
            name: name.into(),
        })
    }

    /// Creates a rule from a field name, failing with
    /// [`CalcError::InvalidField`] when the name is not a log field.
    pub fn parse(
        field: &str,
        key: impl Into<String>,
        name: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self, RuleError> {
        let field = field.parse::<LogField>()?;
        Ok(Self::new(field, key, name, values)?)
    }
}

/// Returns whether `rule` matches `log`.
pub fn matches<L: LogEntry + ?Sized>(rule: &Rule, log: &L) -> bool {
    let haystack = rule.field.read(log);
    match rule.action {
        RuleAction::Includes => rule.values.iter().any(|v| haystack.contains(v.as_str())),
    }
}
