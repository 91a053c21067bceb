//! CLI subcommand implementations.

pub mod import;
pub mod rules;
pub mod totals;
pub mod util;
