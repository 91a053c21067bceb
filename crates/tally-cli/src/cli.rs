//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tally_core::GroupConfig;

/// Rule-driven work log totals.
///
/// Groups time-tracked log entries by task, comment and classification
/// rules, and reports each group's share of the total.
#[derive(Debug, Parser)]
#[command(name = "tally", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Group logs and report per-group totals.
    Totals {
        /// JSON array of log entries. Reads stdin when omitted.
        file: Option<PathBuf>,

        #[command(flatten)]
        group: GroupFlags,

        /// Order groups by time, largest first.
        #[arg(long)]
        sort: bool,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Parse `[issue, comment, time]` rows (a JSON array of rows, or one
    /// row per line) into keyed log entries.
    Import {
        /// Rows file. Reads stdin when omitted.
        file: Option<PathBuf>,
    },

    /// Show the effective grouping toggles and rules.
    Rules,
}

/// Grouping toggles given on the command line.
///
/// When any flag is set, the flags replace the configured toggles.
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct GroupFlags {
    /// Group by issue.
    #[arg(long)]
    pub by_task: bool,

    /// Group by normalized comment.
    #[arg(long)]
    pub by_comment: bool,

    /// Group by first matching rule.
    #[arg(long)]
    pub by_rules: bool,
}

impl GroupFlags {
    /// Resolves the toggles for this run against the configured ones.
    pub const fn resolve(self, configured: GroupConfig) -> GroupConfig {
        if self.by_task || self.by_comment || self.by_rules {
            GroupConfig {
                group_by_task: self.by_task,
                group_by_comment: self.by_comment,
                group_by_rules: self.by_rules,
            }
        } else {
            configured
        }
    }
}
