//! DigiSign command line support
//!
//! Everything the `digisign` binary does, as a library:
//!
//! ```text
//! ┌──────────────┐
//! │   main.rs    │  ← argument parsing, logging setup
//! └──────┬───────┘
//!        │
//!   ┌────┴─────┬──────────┬──────────┐
//!   ▼          ▼          ▼          ▼
//! Commands  Keystore   Report    Config
//!   │
//!   ▼
//! digisign::Orchestrator (containers, PEM keys, Dilithium)
//! ```
//!
//! # Example
//!
//! ```no_run
//! use digisign::{DilithiumPrimitive, Kind, Orchestrator};
//! use digisign_cli::{commands, config::load_config};
//! use std::path::Path;
//!
//! let config = load_config(None)?;
//! let orchestrator = Orchestrator::new(DilithiumPrimitive::new());
//!
//! let (_, files) = commands::keygen(&orchestrator, &config, Kind::Dilithium2, None, false)?;
//! let signed = commands::sign_file(
//!     &orchestrator,
//!     Path::new("report.pdf"),
//!     &files.private_path,
//!     Kind::Dilithium2,
//!     None,
//! )?;
//! let report = commands::verify_file(&orchestrator, &signed, &files.public_path, Kind::Dilithium2, None)?;
//! println!("valid: {}", report.valid);
//! # Ok::<(), digisign_cli::CliError>(())
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod keystore;
pub mod report;
pub mod types;

// Re-export commonly used types
pub use error::{CliError, Result};
pub use types::CliConfig;
