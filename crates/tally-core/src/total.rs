//! Top-level aggregation run producing a [`TotalCalc`].

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use crate::aggregate::aggregate;
use crate::error::CalcError;
use crate::group::GroupConfig;
use crate::log::LogDetail;
use crate::percent::compute_percents;
use crate::rule::Rule;

/// One aggregation bucket with its members, summed time and share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedLog {
    /// Issue of the first member log.
    pub issue: String,
    pub logs: Vec<LogDetail>,
    /// Minutes, including all member dependencies.
    pub time: u64,
    /// Share of the run's grand total, 0..=100.
    pub percent: f64,
    /// Rendered group key.
    pub key: String,
    /// Matched rule name, when grouped by a rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Full result of one aggregation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TotalCalc {
    /// Grand total in minutes.
    pub time: u64,
    pub logs: Vec<GroupedLog>,
}

impl TotalCalc {
    /// Returns a copy with groups ordered by time, largest first, then by
    /// key.
    #[must_use]
    pub fn sorted_by_time(&self) -> Self {
        let mut logs = self.logs.clone();
        logs.sort_by(|a, b| Reverse(a.time).cmp(&Reverse(b.time)).then_with(|| a.key.cmp(&b.key)));
        Self {
            time: self.time,
            logs,
        }
    }
}

/// Groups `logs` under `config` and `rules` and computes per-group shares.
///
/// Inputs are only read. Groups keep first-occurrence order. Every log
/// lands in exactly one group, so the grand total equals the sum of the
/// flattened time of all inputs.
pub fn build(config: &GroupConfig, rules: &[Rule], logs: &[LogDetail]) -> Result<TotalCalc, CalcError> {
    let buckets = aggregate(config, rules, logs)?;
    let time = buckets
        .iter()
        .fold(0_u64, |total, bucket| total.saturating_add(bucket.time));

    tracing::debug!(
        logs = logs.len(),
        rules = rules.len(),
        groups = buckets.len(),
        total_minutes = time,
        ?config,
        "built totals"
    );

    Ok(TotalCalc {
        time,
        logs: compute_percents(buckets, time),
    })
}
