//! Command line error types
//!
//! Wraps the signing core's taxonomy and adds the file system and
//! configuration failures that only exist at the command line.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    /// Signing core error (key, container or primitive)
    ///
    /// Kept intact so the user sees the specific reason, e.g. a missing
    /// PEM delimiter or a truncated container
    #[error(transparent)]
    Digisign(#[from] digisign::DigisignError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Key files could not be written or read
    #[error("Keystore error: {0}")]
    Keystore(String),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Background task panicked or was cancelled
    #[error("Task error: {0}")]
    Task(String),
}

pub type Result<T> = std::result::Result<T, CliError>;

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for CliError {
    fn from(err: config::ConfigError) -> Self {
        CliError::Config(err.to_string())
    }
}

impl From<tokio::task::JoinError> for CliError {
    fn from(err: tokio::task::JoinError) -> Self {
        CliError::Task(err.to_string())
    }
}
