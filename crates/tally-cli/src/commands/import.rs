//! Import command: turns raw `[issue, comment, time]` rows into keyed log
//! entries ready for `tally totals`.

use std::path::Path;

use anyhow::{Context, Result};
use tally_core::{ImportLog, LogDetail, import_rows};

use super::util::read_input;

/// Returns true when `input` is a JSON array of rows rather than one
/// row per line.
fn is_row_array(input: &str) -> bool {
    input
        .trim_start()
        .strip_prefix('[')
        .and_then(|rest| rest.trim_start().chars().next())
        .is_some_and(|ch| ch == '[' || ch == ']')
}

/// Parses a JSON array of rows, or one JSON row per line with blank lines
/// skipped.
fn parse_rows(input: &str) -> Result<Vec<ImportLog>> {
    if is_row_array(input) {
        return serde_json::from_str(input).context("invalid JSON array of rows");
    }

    let mut rows = Vec::new();
    for (idx, line) in input.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let row: ImportLog = serde_json::from_str(trimmed)
            .with_context(|| format!("invalid JSON on line {}", idx + 1))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Parses rows and assigns each entry a fresh key.
pub fn import(input: &str) -> Result<Vec<LogDetail>> {
    let rows = parse_rows(input)?;
    let logs = import_rows(rows).context("failed to import rows")?;
    tracing::debug!(count = logs.len(), "imported rows");
    Ok(logs)
}

/// Runs the import command, printing the entries as a JSON array.
pub fn run(file: Option<&Path>) -> Result<()> {
    let input = read_input(file)?;
    let logs = import(&input)?;
    println!("{}", serde_json::to_string_pretty(&logs)?);
    Ok(())
}
