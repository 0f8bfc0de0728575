//! Error handling for the self-sorting list.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by list construction and configuration loading.
#[derive(Error, Debug)]
pub enum ChainSortError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to spawn sort worker: {0}")]
    WorkerSpawn(#[source] std::io::Error),

    #[error("Failed to read configuration from {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

/// Result type for list operations
pub type Result<T> = std::result::Result<T, ChainSortError>;
