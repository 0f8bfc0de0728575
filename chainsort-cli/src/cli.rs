//! Command-line interface definitions and parsing

use std::path::PathBuf;
use std::time::Duration;

use chainsort_core::SortConfig;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Number of sorting threads
    pub workers: Option<usize>,

    /// Configuration file path (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Sleep between stable sort passes, in milliseconds
    #[arg(long)]
    pub idle_ms: Option<u64>,

    /// Sleep after every swap, in milliseconds
    #[arg(long)]
    pub backoff_ms: Option<u64>,

    /// Maximum characters per pushed piece
    #[arg(long)]
    pub chunk_width: Option<usize>,

    /// How long to wait for sort workers on exit, in milliseconds
    #[arg(long, default_value_t = 5_000)]
    pub grace_ms: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Applies command line values on top of `config`.
    pub fn apply_overrides(&self, mut config: SortConfig) -> SortConfig {
        if let Some(workers) = self.workers {
            config = config.with_workers(workers);
        }
        if let Some(idle_ms) = self.idle_ms {
            config = config.with_idle_interval(Duration::from_millis(idle_ms));
        }
        if let Some(backoff_ms) = self.backoff_ms {
            config = config.with_swap_backoff(Duration::from_millis(backoff_ms));
        }
        if let Some(width) = self.chunk_width {
            config = config.with_chunk_width(width);
        }
        config
    }

    pub fn grace_period(&self) -> Duration {
        Duration::from_millis(self.grace_ms)
    }
}
