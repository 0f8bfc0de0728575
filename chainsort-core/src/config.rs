//! Sort worker configuration.
//!
//! Loaded from a TOML file or built in code. Every field has a default, so a
//! file only needs the keys it overrides:
//!
//! ```toml
//! workers = 4
//! idle_interval_ms = 5000
//! swap_backoff_ms = 1000
//! chunk_width = 80
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ChainSortError, Result};

pub const DEFAULT_WORKERS: usize = 1;
pub const DEFAULT_IDLE_INTERVAL_MS: u64 = 5_000;
pub const DEFAULT_SWAP_BACKOFF_MS: u64 = 1_000;

/// Upper bound on sort workers; each one is an OS thread.
pub const MAX_WORKERS: usize = 1_024;

/// Longest piece a driver line is split into before pushing.
pub const MAX_CHUNK_CHARS: usize = 80;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortConfig {
    /// Number of background sort workers, fixed for the list's lifetime.
    pub workers: usize,

    /// Sleep between stable passes (in milliseconds).
    pub idle_interval_ms: u64,

    /// Sleep after every swap (in milliseconds).
    pub swap_backoff_ms: u64,

    /// Maximum characters per pushed piece in `push_line`.
    pub chunk_width: usize,
}

impl Default for SortConfig {
    fn default() -> Self {
        SortConfig {
            workers: DEFAULT_WORKERS,
            idle_interval_ms: DEFAULT_IDLE_INTERVAL_MS,
            swap_backoff_ms: DEFAULT_SWAP_BACKOFF_MS,
            chunk_width: MAX_CHUNK_CHARS,
        }
    }
}

impl SortConfig {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_idle_interval(mut self, interval: Duration) -> Self {
        self.idle_interval_ms = duration_to_millis(interval);
        self
    }

    pub fn with_swap_backoff(mut self, backoff: Duration) -> Self {
        self.swap_backoff_ms = duration_to_millis(backoff);
        self
    }

    pub fn with_chunk_width(mut self, width: usize) -> Self {
        self.chunk_width = width;
        self
    }

    pub fn idle_interval(&self) -> Duration {
        Duration::from_millis(self.idle_interval_ms)
    }

    pub fn swap_backoff(&self) -> Duration {
        Duration::from_millis(self.swap_backoff_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(ChainSortError::InvalidConfig(
                "at least one sort worker is required".to_string(),
            ));
        }
        if self.workers > MAX_WORKERS {
            return Err(ChainSortError::InvalidConfig(format!(
                "workers must be at most {MAX_WORKERS}, got {}",
                self.workers
            )));
        }
        if self.chunk_width == 0 {
            return Err(ChainSortError::InvalidConfig(
                "chunk_width must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: SortConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|source| ChainSortError::ConfigRead {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_toml_str(&contents)
    }
}

fn duration_to_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
