//! Work log totals CLI library.
//!
//! This crate provides the CLI interface over `tally-core`.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, GroupFlags};
pub use config::Config;
