/// Error type definitions
use thiserror::Error;

use crate::key::KeyRole;

#[derive(Error, Debug)]
pub enum DigisignError {
    /// The expected PEM header/footer pair is absent (wrong file or wrong role)
    #[error("Missing {role} key delimiter: expected \"{expected}\"")]
    MissingDelimiter { role: KeyRole, expected: &'static str },

    /// Base64 or hex text does not decode
    #[error("Malformed encoding: {0}")]
    MalformedEncoding(String),

    #[error("Key too short: {len} bytes (minimum {min})")]
    KeyTooShort { len: usize, min: usize },

    #[error("Not a signed container: bad magic marker")]
    BadMagic,

    /// A declared field length exceeds what is left in the buffer
    #[error("Truncated container: {field} needs {needed} bytes, only {remaining} remain")]
    TruncatedContainer {
        field: &'static str,
        needed: usize,
        remaining: usize,
    },

    #[error("Container field {field} is too large: {len} bytes")]
    ContainerTooLarge { field: &'static str, len: usize },

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Verification failed: {0}")]
    VerificationFailed(String),

    #[error("Key generation failed: {0}")]
    KeyGenerationFailed(String),

    /// The cryptographic backend failed its one-time initialisation
    #[error("Cryptographic backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Unsupported parameter set: {0}")]
    UnsupportedKind(String),
}

impl From<hex::FromHexError> for DigisignError {
    fn from(err: hex::FromHexError) -> Self {
        DigisignError::MalformedEncoding(format!("invalid hex: {}", err))
    }
}

impl From<base64::DecodeError> for DigisignError {
    fn from(err: base64::DecodeError) -> Self {
        DigisignError::MalformedEncoding(format!("invalid base64: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, DigisignError>;
