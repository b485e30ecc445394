//! # Application Errors
//!
//! Top-level error for CLI commands and server startup.

use crate::config::ConfigError;
use cosmos_core::CosmosError;
use thiserror::Error;

/// Anything that can stop a CLI command.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Catalog(#[from] CosmosError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Usage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
