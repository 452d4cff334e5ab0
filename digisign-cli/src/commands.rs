//! Command implementations
//!
//! Each subcommand is a plain function over an [`Orchestrator`] so it can be
//! driven from tests with any primitive.

use crate::error::{CliError, Result};
use crate::keystore::{self, KeyFiles};
use crate::report::{ContainerSummary, FailureReport, VerificationReport};
use crate::types::CliConfig;
use digisign::container::{self, signed_file_name};
use digisign::{KeyPair, KeyRole, Kind, Orchestrator, SignaturePrimitive};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Name used for the container's filename field when signing plain text
pub const TEXT_MESSAGE_NAME: &str = "message";

const FALLBACK_PAYLOAD_NAME: &str = "payload.bin";

/// Generate a key pair and write it under `out_dir` (or the configured key
/// directory)
///
/// Refuses to overwrite existing key files unless `force` is set.
pub fn keygen<P: SignaturePrimitive>(
    orchestrator: &Orchestrator<P>,
    config: &CliConfig,
    kind: Kind,
    out_dir: Option<&Path>,
    force: bool,
) -> Result<(KeyPair, KeyFiles)> {
    let dir = out_dir.unwrap_or(config.key_dir.as_path());
    let files = KeyFiles::locate(dir, &config.private_key_name, &config.public_key_name);

    if files.any_exists() && !force {
        return Err(CliError::Keystore(format!(
            "Key files already exist in {:?}; pass --force to overwrite",
            dir
        )));
    }

    let pair = orchestrator.generate_keys(kind)?;
    let files = keystore::save_key_pair(
        dir,
        &config.private_key_name,
        &config.public_key_name,
        &pair,
    )?;

    Ok((pair, files))
}

/// Sign `input` into `<input>.signed` (or `output`)
pub fn sign_file<P: SignaturePrimitive>(
    orchestrator: &Orchestrator<P>,
    input: &Path,
    key_path: &Path,
    kind: Kind,
    output: Option<&Path>,
) -> Result<PathBuf> {
    let key_text = keystore::load_key_text(key_path)?;
    let payload = fs::read(input)?;
    if container::looks_signed(&payload) {
        warn!("{} is already a signed container; wrapping it again", input.display());
    }
    let filename = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| FALLBACK_PAYLOAD_NAME.to_string());

    let signed = orchestrator.sign(&filename, &payload, &key_text, kind)?;

    let output = match output {
        Some(path) => path.to_path_buf(),
        None => input.with_file_name(signed_file_name(&filename)),
    };
    fs::write(&output, &signed)?;

    info!("Signed container written to {}", output.display());
    Ok(output)
}

/// Detached hex signature over a text message
pub fn sign_text<P: SignaturePrimitive>(
    orchestrator: &Orchestrator<P>,
    message: &str,
    key_path: &Path,
    kind: Kind,
) -> Result<String> {
    let key_text = keystore::load_key_text(key_path)?;
    Ok(orchestrator.sign_detached(message.as_bytes(), &key_text, kind)?)
}

/// Sign a text message into a container named [`TEXT_MESSAGE_NAME`]
pub fn sign_text_to_container<P: SignaturePrimitive>(
    orchestrator: &Orchestrator<P>,
    message: &str,
    key_path: &Path,
    kind: Kind,
    output: &Path,
) -> Result<PathBuf> {
    let key_text = keystore::load_key_text(key_path)?;
    let signed = orchestrator.sign(TEXT_MESSAGE_NAME, message.as_bytes(), &key_text, kind)?;
    fs::write(output, &signed)?;

    info!("Signed message written to {}", output.display());
    Ok(output.to_path_buf())
}

/// Verify one signed file, optionally extracting the payload into
/// `extract_dir` when the signature is valid
pub fn verify_file<P: SignaturePrimitive>(
    orchestrator: &Orchestrator<P>,
    input: &Path,
    key_path: &Path,
    kind: Kind,
    extract_dir: Option<&Path>,
) -> Result<VerificationReport> {
    let key_text = keystore::load_key_text(key_path)?;
    verify_with_key_text(orchestrator, input, &key_text, kind, extract_dir)
}

fn verify_with_key_text<P: SignaturePrimitive>(
    orchestrator: &Orchestrator<P>,
    input: &Path,
    key_text: &str,
    kind: Kind,
    extract_dir: Option<&Path>,
) -> Result<VerificationReport> {
    let data = fs::read(input)?;
    let verification = orchestrator.open(&data, key_text, kind)?;
    let fingerprint = digisign::validate(key_text, KeyRole::Public, kind)?.fingerprint();

    if let Some(dir) = extract_dir {
        if verification.valid {
            let container = &verification.container;
            let path = extract_payload(dir, &container.filename, &container.payload)?;
            info!("Extracted original file to {}", path.display());
        } else {
            warn!("Not extracting {}: signature does not match", input.display());
        }
    }

    Ok(VerificationReport::new(input, &verification, kind, fingerprint))
}

/// Write `payload` into `dir` under the base name of `filename`
///
/// The name comes from the container, so any directory part is dropped.
pub fn extract_payload(dir: &Path, filename: &str, payload: &[u8]) -> Result<PathBuf> {
    let name = Path::new(filename)
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| FALLBACK_PAYLOAD_NAME.into());

    fs::create_dir_all(dir)?;
    let path = dir.join(name);
    fs::write(&path, payload)?;
    Ok(path)
}

/// Verify a detached hex signature over `input`
///
/// `signature` is either the hex text itself or `@path` to a file holding it.
pub fn verify_detached_file<P: SignaturePrimitive>(
    orchestrator: &Orchestrator<P>,
    input: &Path,
    signature: &str,
    key_path: &Path,
    kind: Kind,
) -> Result<bool> {
    let signature_hex = match signature.strip_prefix('@') {
        Some(path) => fs::read_to_string(path)?,
        None => signature.to_string(),
    };
    let key_text = keystore::load_key_text(key_path)?;
    let payload = fs::read(input)?;

    Ok(orchestrator.verify_detached(signature_hex.trim(), &payload, &key_text, kind)?)
}

/// Verify many signed files concurrently on the blocking pool
///
/// Every file gets its own entry, in input order. One bad file never
/// aborts the batch, not even one whose task panicked.
pub async fn verify_batch<P>(
    orchestrator: Arc<Orchestrator<P>>,
    files: Vec<PathBuf>,
    key_path: &Path,
    kind: Kind,
) -> Result<Vec<std::result::Result<VerificationReport, FailureReport>>>
where
    P: SignaturePrimitive + 'static,
{
    let key_text: Arc<str> = keystore::load_key_text(key_path)?.into();

    let handles: Vec<_> = files
        .into_iter()
        .map(|file| {
            let name = file.display().to_string();
            let orchestrator = Arc::clone(&orchestrator);
            let key_text = Arc::clone(&key_text);
            let handle = tokio::task::spawn_blocking(move || {
                verify_with_key_text(&*orchestrator, &file, &key_text, kind, None).map_err(|e| {
                    FailureReport {
                        file: file.display().to_string(),
                        error: e.to_string(),
                    }
                })
            });
            (name, handle)
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for (name, handle) in handles {
        let result = match handle.await {
            Ok(result) => result,
            Err(e) => {
                warn!("Verification task for {} did not finish: {}", name, e);
                Err(FailureReport {
                    file: name,
                    error: CliError::from(e).to_string(),
                })
            }
        };
        results.push(result);
    }

    let valid = results
        .iter()
        .filter(|r| matches!(r, Ok(report) if report.valid))
        .count();
    info!("Batch verification: {}/{} valid", valid, results.len());

    Ok(results)
}

/// Summarise a container without verifying it
pub fn inspect_file(input: &Path) -> Result<ContainerSummary> {
    let data = fs::read(input)?;
    let container = container::unpack(&data)?;
    Ok(ContainerSummary::new(&container, data.len()))
}
