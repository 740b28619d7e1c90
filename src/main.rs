//! Wildfire Planner - Main Entry Point
//!
//! Runs the full planning pipeline when no subcommand is given.

use clap::Parser;
use wildfire_planner::cli::{cmd_config, cmd_plan, cmd_preprocess, cmd_scenarios, Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wildfire_planner=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Plan { data, config, scenarios, seed, output }) => {
            cmd_plan(data.as_deref(), config.as_deref(), scenarios, seed, output.as_deref())?;
        }
        Some(Commands::Preprocess { data, output, config }) => {
            cmd_preprocess(data.as_deref(), &output, config.as_deref())?;
        }
        Some(Commands::Scenarios { data, config, scenarios, seed }) => {
            cmd_scenarios(data.as_deref(), config.as_deref(), scenarios, seed)?;
        }
        Some(Commands::Config { output }) => {
            cmd_config(output.as_deref())?;
        }
        None => {
            cmd_plan(None, None, None, None, None)?;
        }
    }

    Ok(())
}
