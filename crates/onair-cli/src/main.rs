mod clients;
mod runner;
mod schedule;
mod snapshot;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "onair")]
#[command(about = "Sync live-commerce product stock status from QVC inventory")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one stock check if a broadcast window is open
    Check {
        /// Run even when the schedule says no broadcast is live
        #[arg(long)]
        skip_schedule_check: bool,
    },
    /// Wait for today's broadcast window and poll stock until it closes
    Run {
        /// Use the existing schedule document instead of refreshing it first
        #[arg(long)]
        skip_refresh: bool,
    },
    /// Refresh the schedule document from the campaign listing
    Schedule,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = onair_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let result = match cli.command {
        Commands::Check {
            skip_schedule_check,
        } => runner::run_check(&config, skip_schedule_check).await,
        Commands::Run { skip_refresh } => runner::run_live(&config, skip_refresh).await,
        Commands::Schedule => runner::run_schedule(&config).await,
    };

    Ok(exit_status(result))
}

/// Logs a failed command once and maps it to a non-zero exit.
fn exit_status(result: anyhow::Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "onair exited with an error");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod test_support;
