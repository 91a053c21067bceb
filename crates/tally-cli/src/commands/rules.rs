//! Rules command: shows the effective grouping setup.

use anyhow::Result;
use serde::Serialize;
use tally_core::{GroupConfig, Rule};

use crate::Config;

#[derive(Debug, Serialize)]
struct EffectiveRules<'a> {
    group: GroupConfig,
    rules: &'a [Rule],
}

/// Formats the configured toggles and rules as pretty JSON.
pub fn format_rules(config: &Config) -> Result<String> {
    let view = EffectiveRules {
        group: config.group,
        rules: &config.rules,
    };
    Ok(serde_json::to_string_pretty(&view)?)
}

/// Runs the rules command.
pub fn run(config: &Config) -> Result<()> {
    println!("{}", format_rules(config)?);
    Ok(())
}
