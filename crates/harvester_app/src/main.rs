mod cli;
mod config;
mod logging;
mod output;
mod progress;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use engine_logging::{engine_error, engine_info, engine_warn};
use harvester_engine::{
    run_mode, CachedFetcher, DiskCache, FetchSettings, HarvestOutcome, ReqwestFetcher,
};

use crate::cli::Cli;
use crate::config::HarvestConfig;
use crate::progress::TerminalProgress;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::initialize(cli.verbose, &cli.log_dir);
    engine_info!("Harvester started");
    engine_info!("Command line arguments: {:?}", cli);

    match run(&cli) {
        Ok(()) => {
            engine_info!("Harvester finished");
            ExitCode::SUCCESS
        }
        Err(err) => {
            engine_error!("Harvester failed: {:#}", err);
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = HarvestConfig::from_cli(cli)?;

    let cache = DiskCache::new(&config.cache_dir);
    if config.clear_cache {
        let removed = cache
            .clear()
            .with_context(|| format!("clearing cache at {}", config.cache_dir.display()))?;
        engine_info!("Cleared {} cached files", removed);
    }
    let fetcher = CachedFetcher::new(ReqwestFetcher::new(FetchSettings::default()), cache);

    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    let progress = TerminalProgress::new();
    let outcome = runtime.block_on(run_mode(
        config.mode,
        &fetcher,
        &config.settings,
        &progress,
    ))?;

    match outcome {
        HarvestOutcome::Rows(rows) => output::emit(&rows, config.mode, &config.output)?,
        HarvestOutcome::Downloaded { path, bytes } => {
            engine_info!("{} finished: {} bytes in {:?}", config.mode, bytes, path);
        }
        HarvestOutcome::Nothing => {
            engine_warn!("{} produced no results", config.mode);
        }
    }
    Ok(())
}
