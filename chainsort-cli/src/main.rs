//! chainsort - feed lines into a self-sorting list

use std::io;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use chainsort_cli::cli::Cli;
use chainsort_cli::driver;
use chainsort_core::{SelfSortingList, SortConfig};

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging
    setup_logging(cli.verbose);

    let config = load_configuration(&cli)?;
    let list = SelfSortingList::new(config).context("failed to start sort workers")?;

    let stdin = io::stdin();
    let stdout = io::stdout();

    let exit_code = match driver::run(&list, stdin.lock(), &mut stdout.lock()) {
        Ok(stats) => {
            info!(lines = stats.lines, pieces = stats.pieces, prints = stats.prints, "input finished");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("Error reading input: {}", err);
            ExitCode::FAILURE
        }
    };

    driver::shutdown(&list, &mut stdout.lock(), cli.grace_period())
        .context("failed to write shutdown report")?;

    Ok(exit_code)
}

/// Setup logging based on verbosity level; `RUST_LOG` takes precedence.
fn setup_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Logs go to stderr; stdout carries the list contents.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_names(true)
        .init();
}

/// Load configuration from file or use defaults, then apply CLI overrides.
fn load_configuration(cli: &Cli) -> anyhow::Result<SortConfig> {
    let base = match &cli.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            SortConfig::load_from_file(path)?
        }
        None => SortConfig::default(),
    };

    let config = cli.apply_overrides(base);
    config.validate()?;
    Ok(config)
}
