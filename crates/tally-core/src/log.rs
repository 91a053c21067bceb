//! Work log records as they enter the engine.

use serde::{Deserialize, Serialize};

use crate::types::{LogKey, ValidationError};

/// Read access to the fields rules can match against.
///
/// Lets matching and key resolution work over both plain [`Log`] values
/// (e.g. flattened dependency spans) and [`LogDetail`] entries.
pub trait LogEntry {
    /// Issue (task) identifier the time was booked against.
    fn issue(&self) -> &str;

    /// Free-text comment.
    fn comment(&self) -> &str;

    /// Duration in minutes.
    fn time(&self) -> u64;
}

/// A single time-tracked work entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Log {
    pub issue: String,
    pub comment: String,
    /// Duration in minutes.
    pub time: u64,
}

impl LogEntry for Log {
    fn issue(&self) -> &str {
        &self.issue
    }

    fn comment(&self) -> &str {
        &self.comment
    }

    fn time(&self) -> u64 {
        self.time
    }
}

/// A nested contributing entry of a [`LogDetail`].
///
/// On the wire a dependency is a plain `{issue, comment, time}` record.
/// It may carry its own `deps` and, when the source tracked one, a `key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepLog {
    pub issue: String,
    pub comment: String,
    /// Duration in minutes, excluding nested dependencies.
    pub time: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deps: Vec<DepLog>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<LogKey>,
}

impl DepLog {
    /// Attaches a nested dependency.
    #[must_use]
    pub fn with_dep(mut self, dep: impl Into<Self>) -> Self {
        self.deps.push(dep.into());
        self
    }

    /// Returns the entry's own fields, without dependencies.
    pub fn to_log(&self) -> Log {
        Log {
            issue: self.issue.clone(),
            comment: self.comment.clone(),
            time: self.time,
        }
    }
}

impl From<Log> for DepLog {
    fn from(log: Log) -> Self {
        Self {
            issue: log.issue,
            comment: log.comment,
            time: log.time,
            deps: Vec::new(),
            key: None,
        }
    }
}

impl From<LogDetail> for DepLog {
    fn from(detail: LogDetail) -> Self {
        Self {
            issue: detail.issue,
            comment: detail.comment,
            time: detail.time,
            deps: detail.deps,
            key: Some(detail.key),
        }
    }
}

impl LogEntry for DepLog {
    fn issue(&self) -> &str {
        &self.issue
    }

    fn comment(&self) -> &str {
        &self.comment
    }

    fn time(&self) -> u64 {
        self.time
    }
}

/// A log entry enriched with its nested dependency entries and a stable key.
///
/// Dependencies form a tree owned by their parent. Their time is counted
/// into whichever group the parent resolves to; they never form groups of
/// their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogDetail {
    pub issue: String,
    pub comment: String,
    /// Duration in minutes, excluding dependencies.
    pub time: u64,
    #[serde(default)]
    pub deps: Vec<DepLog>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub key: LogKey,
}

impl LogDetail {
    /// Creates a leaf entry with no dependencies.
    pub fn new(
        key: LogKey,
        issue: impl Into<String>,
        comment: impl Into<String>,
        time: u64,
    ) -> Self {
        Self {
            issue: issue.into(),
            comment: comment.into(),
            time,
            deps: Vec::new(),
            name: None,
            key,
        }
    }

    /// Attaches a dependency entry.
    #[must_use]
    pub fn with_dep(mut self, dep: impl Into<DepLog>) -> Self {
        self.deps.push(dep.into());
        self
    }

    /// Returns the entry's own fields, without dependencies.
    pub fn to_log(&self) -> Log {
        Log {
            issue: self.issue.clone(),
            comment: self.comment.clone(),
            time: self.time,
        }
    }
}

impl LogEntry for LogDetail {
    fn issue(&self) -> &str {
        &self.issue
    }

    fn comment(&self) -> &str {
        &self.comment
    }

    fn time(&self) -> u64 {
        self.time
    }
}

/// One externally sourced row: `[issue, comment, time]`, all strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportLog(pub String, pub String, pub String);

impl ImportLog {
    /// Parses the row into a leaf [`LogDetail`] under the given key.
    pub fn into_detail(self, key: LogKey) -> Result<LogDetail, ValidationError> {
        let Self(issue, comment, time) = self;
        let issue = issue.trim().to_string();
        if issue.is_empty() {
            return Err(ValidationError::Empty { field: "issue" });
        }
        let time = crate::import::parse_duration(&time)?;
        Ok(LogDetail::new(key, issue, comment.trim(), time))
    }
}
