//! Grouping configuration and group key resolution.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::log::LogEntry;
use crate::rule::{Rule, matches};
use crate::types::RuleKey;

/// Rendered key of the single bucket used when no dimension is enabled.
pub const UNGROUPED: &str = "ungrouped";

/// Rendered rule segment for logs no rule claims.
pub const UNMATCHED: &str = "unmatched";

/// Which dimensions participate in grouping. All toggles are independent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GroupConfig {
    pub group_by_task: bool,
    pub group_by_comment: bool,
    pub group_by_rules: bool,
}

/// Rule dimension value of a group key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuleSegment {
    /// Key of the first rule that matched.
    Matched(RuleKey),
    /// No rule matched.
    Unmatched,
}

/// Structured grouping key. Disabled dimensions are `None`.
///
/// Equality on the structure, not on the rendered string, decides bucket
/// membership.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey {
    pub task: Option<String>,
    pub comment: Option<String>,
    pub rule: Option<RuleSegment>,
}

impl GroupKey {
    /// Returns true when no dimension is enabled.
    pub const fn is_global(&self) -> bool {
        self.task.is_none() && self.comment.is_none() && self.rule.is_none()
    }
}

impl fmt::Display for GroupKey {
    /// Enabled segments joined by `/`, with `\` and `/` escaped inside
    /// segments so distinct keys render distinctly.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_global() {
            return f.write_str(UNGROUPED);
        }

        let rule = self.rule.as_ref().map(|segment| match segment {
            RuleSegment::Matched(key) => key.as_str(),
            RuleSegment::Unmatched => UNMATCHED,
        });
        let segments = [self.task.as_deref(), self.comment.as_deref(), rule];

        let mut first = true;
        for segment in segments.into_iter().flatten() {
            if !first {
                f.write_str("/")?;
            }
            first = false;
            for ch in segment.chars() {
                if ch == '/' || ch == '\\' {
                    f.write_str("\\")?;
                }
                write!(f, "{ch}")?;
            }
        }
        Ok(())
    }
}

/// Normalizes a comment for grouping: trimmed and case-folded.
pub fn normalize_comment(comment: &str) -> String {
    comment.trim().to_lowercase()
}

/// Returns the first rule in declaration order that matches `log`.
pub fn first_matching_rule<'r, L: LogEntry + ?Sized>(rules: &'r [Rule], log: &L) -> Option<&'r Rule> {
    rules.iter().find(|rule| matches(rule, log))
}

/// Computes the grouping key of `log` under `config`.
///
/// Dimensions in fixed order: task issue, normalized comment, first
/// matching rule.
pub fn resolve_key<L: LogEntry + ?Sized>(config: &GroupConfig, rules: &[Rule], log: &L) -> GroupKey {
    GroupKey {
        task: config.group_by_task.then(|| log.issue().to_string()),
        comment: config
            .group_by_comment
            .then(|| normalize_comment(log.comment())),
        rule: config.group_by_rules.then(|| {
            first_matching_rule(rules, log).map_or(RuleSegment::Unmatched, |rule| {
                RuleSegment::Matched(rule.key.clone())
            })
        }),
    }
}
