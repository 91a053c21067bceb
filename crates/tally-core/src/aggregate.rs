//! Folding of log entries into grouped buckets.

use std::collections::HashMap;

use rayon::prelude::*;

use crate::error::CalcError;
use crate::flatten::flattened_time;
use crate::group::{GroupConfig, GroupKey, first_matching_rule, resolve_key};
use crate::log::LogDetail;
use crate::rule::Rule;

/// One aggregation bucket before percentages are known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub key: GroupKey,
    /// Issue of the first log that landed in this bucket.
    pub issue: String,
    /// Name of the matched rule, when grouping by rules and one matched.
    pub name: Option<String>,
    /// Member entries in input order, dependencies left nested.
    pub logs: Vec<LogDetail>,
    /// Sum of flattened time across members, in minutes.
    pub time: u64,
}

/// Groups `logs` by their resolved key.
///
/// Buckets come back in first-occurrence order of their key. Per-log work
/// (key resolution and flattening) runs in parallel; the fold is
/// sequential, so the result and the reported error are the same as for a
/// sequential run.
pub fn aggregate(
    config: &GroupConfig,
    rules: &[Rule],
    logs: &[LogDetail],
) -> Result<Vec<Bucket>, CalcError> {
    let resolved: Vec<Result<(GroupKey, u64), CalcError>> = logs
        .par_iter()
        .map(|log| -> Result<(GroupKey, u64), CalcError> {
            Ok((resolve_key(config, rules, log), flattened_time(log)?))
        })
        .collect();

    let mut buckets: Vec<Bucket> = Vec::new();
    let mut index: HashMap<GroupKey, usize> = HashMap::new();

    for (log, entry) in logs.iter().zip(resolved) {
        let (key, time) = entry?;
        tracing::trace!(log = %log.key, group = %key, time, "resolved log");

        let slot = if let Some(&slot) = index.get(&key) {
            slot
        } else {
            let name = if config.group_by_rules {
                first_matching_rule(rules, log).map(|rule| rule.name.clone())
            } else {
                None
            };
            buckets.push(Bucket {
                key: key.clone(),
                issue: log.issue.clone(),
                name,
                logs: Vec::new(),
                time: 0,
            });
            index.insert(key, buckets.len() - 1);
            buckets.len() - 1
        };

        let bucket = &mut buckets[slot];
        bucket.logs.push(log.clone());
        bucket.time = bucket.time.saturating_add(time);
    }

    Ok(buckets)
}
