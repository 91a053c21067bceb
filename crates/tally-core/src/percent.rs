//! Percentage shares of the grand total.

use crate::aggregate::Bucket;
use crate::total::GroupedLog;

/// Share of `time` in `grand_total`, in percent. Zero when the grand
/// total is zero.
#[allow(clippy::cast_precision_loss)]
pub fn percent_of(time: u64, grand_total: u64) -> f64 {
    if grand_total == 0 {
        return 0.0;
    }
    // Multiply first: integer shares like 30/40 come out exact.
    (time as f64 * 100.0) / grand_total as f64
}

/// Assigns each bucket its share of `grand_total`, keeping bucket order.
pub fn compute_percents(buckets: Vec<Bucket>, grand_total: u64) -> Vec<GroupedLog> {
    buckets
        .into_iter()
        .map(|bucket| GroupedLog {
            percent: percent_of(bucket.time, grand_total),
            key: bucket.key.to_string(),
            issue: bucket.issue,
            name: bucket.name,
            logs: bucket.logs,
            time: bucket.time,
        })
        .collect()
}
