//! Key validator
//!
//! Every sign and verify goes through [`validate`] first. A key is never
//! trusted because its file name ended in `.pem` or `.pub`.

use crate::encoding::{decode_base64, encode_base64};
use crate::error::{DigisignError, Result};
use crate::key::{KeyMaterial, KeyRole};
use crate::kind::Kind;
use crate::pem;

/// Check a loaded text blob and turn it into [`KeyMaterial`]
///
/// Steps, each short-circuiting:
/// 1. both the header and the footer of `role` must be present
/// 2. the body must survive a base64 decode / re-encode round trip
/// 3. the decoded key must be at least [`crate::key::MIN_KEY_LEN`] bytes
///
/// `kind` is not inferable from the bytes and comes from the caller.
pub fn validate(text: &str, role: KeyRole, kind: Kind) -> Result<KeyMaterial> {
    let trimmed = text.trim();

    for delimiter in [role.header(), role.footer()] {
        if !trimmed.contains(delimiter) {
            tracing::debug!("Key text is missing {} delimiter \"{}\"", role, delimiter);
            return Err(DigisignError::MissingDelimiter {
                role,
                expected: delimiter,
            });
        }
    }

    let body = pem::extract_body(trimmed, role);
    let bytes = decode_base64(&body)?;
    if encode_base64(&bytes) != body {
        return Err(DigisignError::MalformedEncoding(
            "key body does not round-trip through base64".to_string(),
        ));
    }

    let key = KeyMaterial::new(kind, role, bytes)?;

    tracing::debug!(
        "Validated {} key: kind={}, len={} bytes",
        role,
        kind,
        key.as_bytes().len()
    );

    Ok(key)
}
