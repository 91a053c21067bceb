use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tally_cli::commands::{import, rules, totals};
use tally_cli::{Cli, Commands, Config};

fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    match &cli.command {
        Some(Commands::Totals {
            file,
            group,
            sort,
            json,
        }) => {
            let config = load_config(cli.config.as_deref())?;
            totals::run(&config, file.as_deref(), *group, *sort, *json)?;
        }
        Some(Commands::Import { file }) => {
            // Import doesn't need config - rows carry everything
            import::run(file.as_deref())?;
        }
        Some(Commands::Rules) => {
            let config = load_config(cli.config.as_deref())?;
            rules::run(&config)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
