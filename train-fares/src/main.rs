use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use train_fares::acquire::{Orchestrator, ReplayProvider, RunPhase, StopSignal};
use train_fares::config::ConfigFile;
use train_fares::matcher;

/// Collect train fares and search them for cheap round trips.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Request every configured route and date and append the offers to the ledger
    Acquire,

    /// Pair outbound and return trains from the ledger and write the cheapest
    Match,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let file = match ConfigFile::load(&cli.config) {
        Ok(file) => file,
        Err(e) => {
            error!(error = %e, "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Command::Acquire => acquire(&file).await,
        Command::Match => run_matcher(&file),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "failed");
            ExitCode::FAILURE
        }
    }
}

async fn acquire(file: &ConfigFile) -> Result<(), Box<dyn std::error::Error>> {
    let settings = file.acquire()?;
    let provider = ReplayProvider::new(&settings.replay_dir, settings.operator);

    // Ctrl-C stops the run before its next request
    let stop = StopSignal::new();
    let on_interrupt = stop.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, stopping after the current request");
            on_interrupt.stop();
        }
    });

    let report = Orchestrator::new(&provider, settings.config)
        .with_stop_signal(stop)
        .run()
        .await?;

    info!(
        phase = ?report.phase,
        planned = report.planned,
        completed = report.completed,
        records = report.records_written,
        missing = report.missing.len(),
        "finished"
    );
    if report.phase == RunPhase::Aborted {
        warn!("acquisition gave up; see the missing services report");
    }
    Ok(())
}

fn run_matcher(file: &ConfigFile) -> Result<(), Box<dyn std::error::Error>> {
    let config = file.matcher()?;
    let report = matcher::run(&config)?;
    if let Some(best) = report.ranked.first() {
        info!(total = %best.trip.total, "cheapest round trip");
    }
    Ok(())
}
