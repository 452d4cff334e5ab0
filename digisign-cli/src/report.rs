//! Verification reports
//!
//! JSON records printed by `verify --json`, `verify-batch` and `inspect`.

use chrono::{DateTime, Utc};
use digisign::{Kind, SignedContainer, Verification};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Result of verifying one signed file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    /// Path of the signed container that was checked
    pub file: String,
    /// File name recorded inside the container
    pub original_filename: String,
    pub payload_size: usize,
    pub payload_size_human: String,
    pub signature_hex_len: usize,
    pub kind: Kind,
    pub valid: bool,
    /// SHA3-256 fingerprint of the public key used
    pub key_fingerprint: String,
    pub checked_at: DateTime<Utc>,
}

impl VerificationReport {
    pub fn new(file: &Path, verification: &Verification, kind: Kind, key_fingerprint: String) -> Self {
        let container = &verification.container;
        Self {
            file: file.display().to_string(),
            original_filename: container.filename.clone(),
            payload_size: container.payload.len(),
            payload_size_human: format_file_size(container.payload.len() as u64),
            signature_hex_len: container.signature_text.len(),
            kind,
            valid: verification.valid,
            key_fingerprint,
            checked_at: Utc::now(),
        }
    }
}

/// Failed attempt in a batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureReport {
    pub file: String,
    pub error: String,
}

/// Container contents shown by `inspect` (nothing is verified)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerSummary {
    pub original_filename: String,
    pub container_size: usize,
    pub payload_size: usize,
    pub payload_size_human: String,
    pub signature_hex_len: usize,
    /// Raw signature length the hex text would decode to
    pub signature_bytes: usize,
}

impl ContainerSummary {
    pub fn new(container: &SignedContainer, container_size: usize) -> Self {
        Self {
            original_filename: container.filename.clone(),
            container_size,
            payload_size: container.payload.len(),
            payload_size_human: format_file_size(container.payload.len() as u64),
            signature_hex_len: container.signature_text.len(),
            signature_bytes: container.signature_text.len() / 2,
        }
    }
}

/// `512 B`, `1.50 KB`, `2.00 MB` (1024 based)
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;

    if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < MB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    }
}
