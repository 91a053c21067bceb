//! Totals command: groups log entries and reports each group's share.
//!
//! Output formats: human-readable table (default) or JSON (`--json`), the
//! latter being the serialized `TotalCalc`.

use std::path::Path;

use anyhow::{Context, Result};
use tally_core::{GroupedLog, LogDetail, TotalCalc};

use super::util::{format_duration, progress_bar, read_input};
use crate::{Config, GroupFlags};

/// Parses a JSON array of log entries.
pub fn parse_logs(input: &str) -> Result<Vec<LogDetail>> {
    serde_json::from_str(input).context("invalid log entries JSON")
}

/// Runs the engine over `logs` with the configured rules and the effective
/// grouping toggles.
pub fn compute(config: &Config, flags: GroupFlags, logs: &[LogDetail]) -> Result<TotalCalc> {
    let group = flags.resolve(config.group);
    tracing::debug!(?group, rules = config.rules.len(), logs = logs.len(), "computing totals");
    let calc = tally_core::build(&group, &config.rules, logs).context("failed to compute totals")?;
    Ok(calc)
}

fn group_label(group: &GroupedLog) -> String {
    match &group.name {
        Some(name) if !name.is_empty() => format!("{} ({name})", group.key),
        _ => group.key.clone(),
    }
}

/// Formats the human-readable totals table.
pub fn format_totals(calc: &TotalCalc) -> String {
    let mut lines = vec!["TOTALS".to_string(), "──────".to_string()];

    if calc.logs.is_empty() {
        lines.push(String::new());
        lines.push("No logs to total.".to_string());
        return lines.join("\n") + "\n";
    }

    for group in &calc.logs {
        let label = group_label(group);
        let duration = format_duration(group.time);
        let percent = group.percent;
        let bar = progress_bar(group.time, calc.time);
        lines.push(format!("{label:<28} {duration:>7}  {percent:>5.1}%  {bar}"));
    }

    let log_count: usize = calc.logs.iter().map(|g| g.logs.len()).sum();
    lines.push(String::new());
    lines.push(format!(
        "Total: {} in {} groups ({log_count} logs)",
        format_duration(calc.time),
        calc.logs.len()
    ));

    lines.join("\n") + "\n"
}

/// Formats totals as pretty JSON.
pub fn format_totals_json(calc: &TotalCalc) -> Result<String> {
    Ok(serde_json::to_string_pretty(calc)?)
}

/// Runs the totals command.
pub fn run(
    config: &Config,
    file: Option<&Path>,
    flags: GroupFlags,
    sort: bool,
    json: bool,
) -> Result<()> {
    let input = read_input(file)?;
    let logs = parse_logs(&input)?;
    let mut calc = compute(config, flags, &logs)?;
    if sort {
        calc = calc.sorted_by_time();
    }

    if json {
        println!("{}", format_totals_json(&calc)?);
    } else {
        print!("{}", format_totals(&calc));
    }

    Ok(())
}
