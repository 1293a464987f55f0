use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tsm_cli::commands::{report, trips, weekly};
use tsm_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    match &cli.command {
        Some(Commands::Report {
            input,
            out,
            json,
            project,
            year,
            month,
        }) => {
            let filter = report::ReportFilter::from_args(project.as_deref(), *year, *month)?;
            report::run(&config, input, out.clone(), *json, &filter)?;
        }
        Some(Commands::Trips {
            input,
            freelancer,
            project,
            year,
            month,
            json,
        }) => {
            let filter = trips::TripFilter::from_args(
                freelancer.as_deref(),
                project.as_deref(),
                *year,
                *month,
            )?;
            trips::run(&config, input, &filter, *json)?;
        }
        Some(Commands::Weekly { input, json }) => {
            weekly::run(&config, input, *json)?;
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
