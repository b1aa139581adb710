//! Application error types

use thiserror::Error;

/// Startup failures, reported by the server binary before it serves
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
