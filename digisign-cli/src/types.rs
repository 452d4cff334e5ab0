//! Shared data types

use std::path::PathBuf;

use digisign::Kind;
use serde::{Deserialize, Serialize};

/// Command line configuration
///
/// Layered from built-in defaults, an optional TOML file and `DIGISIGN_*`
/// environment variables (in that order, later wins).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// Parameter set used when `--kind` is not given
    pub default_kind: Kind,

    /// Directory for generated key files
    pub key_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// File stem of the private key (`<name>.pem`)
    pub private_key_name: String,

    /// File stem of the public key (`<name>.pub`)
    pub public_key_name: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            default_kind: Kind::Dilithium2,
            key_dir: dirs::home_dir()
                .map(|home| home.join(".digisign").join("keys"))
                .unwrap_or_else(|| PathBuf::from("./keys")),
            log_level: "info".to_string(),
            private_key_name: "dilithium_private".to_string(),
            public_key_name: "dilithium_public".to_string(),
        }
    }
}
