//! Expansion of dependency trees into linear time contributions.
//!
//! A node's identity is its key when it carries one. Keyless dependencies
//! are identified by their place in the tree, which owns them, so they
//! can never be reached twice. Traversal tracks the keys on the current
//! root-to-node path and rejects a key that reappears on its own path.
//! The walk is iterative, so deep chains do not grow the call stack.

use std::collections::HashSet;

use crate::error::CalcError;
use crate::log::{DepLog, Log, LogDetail, LogEntry};
use crate::types::LogKey;

enum Step<'a> {
    Enter(&'a DepLog),
    Exit(Option<&'a LogKey>),
}

/// Visits `log` and all its dependencies depth-first, parents first.
fn walk<'a>(log: &'a LogDetail, mut visit: impl FnMut(&'a dyn LogEntry)) -> Result<(), CalcError> {
    let mut path: HashSet<&LogKey> = HashSet::from([&log.key]);
    visit(log);
    let mut stack: Vec<Step<'a>> = log.deps.iter().rev().map(Step::Enter).collect();

    while let Some(step) = stack.pop() {
        match step {
            Step::Enter(node) => {
                if let Some(key) = &node.key {
                    if !path.insert(key) {
                        return Err(CalcError::CyclicDependency { key: key.clone() });
                    }
                }
                visit(node);
                stack.push(Step::Exit(node.key.as_ref()));
                stack.extend(node.deps.iter().rev().map(Step::Enter));
            }
            Step::Exit(Some(key)) => {
                path.remove(key);
            }
            Step::Exit(None) => {}
        }
    }
    Ok(())
}

/// Returns the entry itself (without deps) followed by a depth-first
/// traversal of its dependencies.
pub fn flatten(log: &LogDetail) -> Result<Vec<Log>, CalcError> {
    let mut out = Vec::new();
    walk(log, |node| {
        out.push(Log {
            issue: node.issue().to_string(),
            comment: node.comment().to_string(),
            time: node.time(),
        });
    })?;
    Ok(out)
}

/// Total minutes contributed by `log`: its own time plus every
/// descendant's.
pub fn flattened_time(log: &LogDetail) -> Result<u64, CalcError> {
    let mut total: u64 = 0;
    walk(log, |node| total = total.saturating_add(node.time()))?;
    Ok(total)
}
