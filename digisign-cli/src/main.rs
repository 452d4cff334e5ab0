//! DigiSign command line
//!
//! 1. Generate a Dilithium key pair (`.pem` / `.pub`)
//! 2. Sign a file into a `.signed` container, or a text message
//! 3. Verify containers and detached signatures against a public key

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use digisign::{DilithiumPrimitive, Kind, Orchestrator};
use digisign_cli::{commands, config, CliConfig};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Post-quantum signing of documents and messages
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "digisign.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides config file
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a new key pair
    Keygen {
        /// Parameter set (2, 3 or 5)
        #[arg(short, long)]
        kind: Option<Kind>,
        /// Output directory (defaults to the configured key directory)
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
        /// Overwrite existing key files
        #[arg(long, default_value_t = false)]
        force: bool,
        /// Print the public key as hex
        #[arg(long, default_value_t = false)]
        show_public: bool,
    },

    /// Sign a file into `<FILE>.signed`
    Sign {
        file: PathBuf,
        /// Private key (.pem)
        #[arg(short, long)]
        key: PathBuf,
        #[arg(long)]
        kind: Option<Kind>,
        /// Output path (defaults to `<FILE>.signed`)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Sign a text message and print the hex signature
    SignText {
        message: String,
        /// Private key (.pem)
        #[arg(short, long)]
        key: PathBuf,
        #[arg(long)]
        kind: Option<Kind>,
        /// Also write a signed container to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Verify a signed container
    Verify {
        file: PathBuf,
        /// Public key (.pub)
        #[arg(short, long)]
        key: PathBuf,
        #[arg(long)]
        kind: Option<Kind>,
        /// Write the original file here when the signature is valid
        #[arg(short, long)]
        extract: Option<PathBuf>,
        /// Print the verification report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Verify a detached hex signature over a file
    VerifyDetached {
        file: PathBuf,
        /// Hex signature, or `@path` to a file containing it
        #[arg(short, long)]
        signature: String,
        /// Public key (.pub)
        #[arg(short, long)]
        key: PathBuf,
        #[arg(long)]
        kind: Option<Kind>,
    },

    /// Verify several signed containers concurrently
    VerifyBatch {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Public key (.pub)
        #[arg(short, long)]
        key: PathBuf,
        #[arg(long)]
        kind: Option<Kind>,
    },

    /// Show what a signed container holds, without verifying it
    Inspect { file: PathBuf },
}

/// Signature matched, or the command had nothing to verify
const EXIT_OK: u8 = 0;
/// Signature does not match
const EXIT_INVALID: u8 = 1;
/// Any error, including bad configuration
const EXIT_ERROR: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // 1. Load configuration (logging is not up yet, so report on stderr)
    let config = match load_settings(&args.config, args.log_level.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {:#}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    // 2. Initialize logging
    init_logging(&config.log_level);
    debug!("Configuration: {:?}", config);

    let orchestrator = Arc::new(Orchestrator::new(DilithiumPrimitive::new()));

    // 3. Run command
    let result = run(args.command, &config, orchestrator).await;
    if let Err(e) = &result {
        error!("❌ {:#}", e);
    }
    ExitCode::from(exit_status(&result))
}

/// Configuration file and environment, then the `--log-level` override
fn load_settings(path: &Path, log_level: Option<&str>) -> Result<CliConfig> {
    let mut config = config::load_config(Some(path)).context("Failed to load configuration")?;

    if let Some(level) = log_level {
        config.log_level = level.to_string();
        config::validate_config(&config).context("Invalid --log-level")?;
    }

    Ok(config)
}

fn exit_status(result: &Result<u8>) -> u8 {
    match result {
        Ok(code) => *code,
        Err(_) => EXIT_ERROR,
    }
}

async fn run(
    command: Command,
    config: &CliConfig,
    shared: Arc<Orchestrator<DilithiumPrimitive>>,
) -> Result<u8> {
    let orchestrator = shared.as_ref();

    match command {
        Command::Keygen {
            kind,
            out_dir,
            force,
            show_public,
        } => {
            let kind = kind.unwrap_or(config.default_kind);
            let (pair, files) =
                commands::keygen(orchestrator, config, kind, out_dir.as_deref(), force)
                    .context("Key generation failed")?;

            info!("✅ Generated {} key pair", kind);
            println!("Private key: {}", files.private_path.display());
            println!("Public key:  {}", files.public_path.display());
            println!("Fingerprint: {}", pair.public.fingerprint());
            if show_public {
                println!("{}", digisign::encoding::bytes_to_hex(pair.public.as_bytes()));
            }
        }

        Command::Sign {
            file,
            key,
            kind,
            output,
        } => {
            let kind = kind.unwrap_or(config.default_kind);
            let signed = commands::sign_file(orchestrator, &file, &key, kind, output.as_deref())
                .with_context(|| format!("Failed to sign {}", file.display()))?;
            println!("{}", signed.display());
        }

        Command::SignText {
            message,
            key,
            kind,
            output,
        } => {
            let kind = kind.unwrap_or(config.default_kind);
            if let Some(output) = output {
                let signed =
                    commands::sign_text_to_container(orchestrator, &message, &key, kind, &output)
                        .context("Failed to sign message")?;
                println!("{}", signed.display());
            } else {
                let signature = commands::sign_text(orchestrator, &message, &key, kind)
                    .context("Failed to sign message")?;
                println!("{}", signature);
            }
        }

        Command::Verify {
            file,
            key,
            kind,
            extract,
            json,
        } => {
            let kind = kind.unwrap_or(config.default_kind);
            let report = commands::verify_file(orchestrator, &file, &key, kind, extract.as_deref())
                .with_context(|| format!("Failed to verify {}", file.display()))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else if report.valid {
                println!("✓ Signature is valid ({})", report.original_filename);
            } else {
                println!("✗ Signature is NOT valid ({})", report.original_filename);
            }

            if !report.valid {
                return Ok(EXIT_INVALID);
            }
        }

        Command::VerifyDetached {
            file,
            signature,
            key,
            kind,
        } => {
            let kind = kind.unwrap_or(config.default_kind);
            let valid = commands::verify_detached_file(orchestrator, &file, &signature, &key, kind)
                .with_context(|| format!("Failed to verify {}", file.display()))?;

            if valid {
                println!("✓ Signature is valid");
            } else {
                println!("✗ Signature is NOT valid");
                return Ok(EXIT_INVALID);
            }
        }

        Command::VerifyBatch { files, key, kind } => {
            let kind = kind.unwrap_or(config.default_kind);
            let results = commands::verify_batch(Arc::clone(&shared), files, &key, kind)
                .await
                .context("Batch verification failed")?;

            let mut all_valid = true;
            for result in &results {
                let line = match result {
                    Ok(report) => {
                        all_valid &= report.valid;
                        serde_json::to_string(report)?
                    }
                    Err(failure) => {
                        all_valid = false;
                        serde_json::to_string(failure)?
                    }
                };
                println!("{}", line);
            }

            if !all_valid {
                return Ok(EXIT_INVALID);
            }
        }

        Command::Inspect { file } => {
            let summary = commands::inspect_file(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(EXIT_OK)
}

/// Initialize logging system (stderr, so stdout stays machine-readable)
fn init_logging(log_level: &str) {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
