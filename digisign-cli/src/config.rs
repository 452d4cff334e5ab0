//! Configuration management module
//!
//! Responsible for loading and validating the command line configuration

use crate::error::{CliError, Result};
use crate::types::CliConfig;
use config::{Config, Environment, File};
use std::path::Path;

/// Environment variable prefix, e.g. `DIGISIGN_DEFAULT_KIND=3`
pub const ENV_PREFIX: &str = "DIGISIGN";

pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Load configuration from defaults, an optional file and the environment
///
/// A missing file is not an error; only the defaults and environment
/// variables are used then.
///
/// # Example
/// ```no_run
/// use digisign_cli::config::load_config;
///
/// let config = load_config(Some("digisign.toml".as_ref())).expect("Failed to load config");
/// println!("Keys live in {}", config.key_dir.display());
/// ```
pub fn load_config(config_path: Option<&Path>) -> Result<CliConfig> {
    let mut builder = Config::builder().add_source(Config::try_from(&CliConfig::default())?);

    if let Some(path) = config_path {
        if path.exists() {
            tracing::debug!("Reading configuration file {}", path.display());
            builder = builder.add_source(File::from(path));
        } else {
            tracing::debug!("Configuration file {} not found, using defaults", path.display());
        }
    }

    let config = builder
        .add_source(Environment::with_prefix(ENV_PREFIX))
        .build()
        .map_err(|e| CliError::Config(format!("Failed to load configuration: {}", e)))?;

    let cli_config: CliConfig = config
        .try_deserialize()
        .map_err(|e| CliError::Config(format!("Failed to parse configuration: {}", e)))?;

    validate_config(&cli_config)?;

    Ok(cli_config)
}

/// Validate configuration
///
/// Checks:
/// - log level is one of [`LOG_LEVELS`]
/// - key file names are non-empty and contain no path separators
pub fn validate_config(config: &CliConfig) -> Result<()> {
    if !LOG_LEVELS.contains(&config.log_level.to_lowercase().as_str()) {
        return Err(CliError::Config(format!(
            "Invalid log level: {} (expected one of {})",
            config.log_level,
            LOG_LEVELS.join(", ")
        )));
    }

    for (field, name) in [
        ("private_key_name", &config.private_key_name),
        ("public_key_name", &config.public_key_name),
    ] {
        if name.trim().is_empty() {
            return Err(CliError::Config(format!("{} must not be empty", field)));
        }
        if name.contains('/') || name.contains('\\') {
            return Err(CliError::Config(format!(
                "{} must be a file name, not a path: {}",
                field, name
            )));
        }
    }

    Ok(())
}
