//! Signing and verification orchestration
//!
//! Composes the key validator, the transcoders and the container codec
//! with an injected [`SignaturePrimitive`]. Calls share no mutable state,
//! so one orchestrator can serve any number of threads.

use crate::container::{self, SignedContainer};
use crate::encoding::{bytes_to_hex, hex_to_bytes};
use crate::error::{DigisignError, Result};
use crate::key::{KeyMaterial, KeyPair, KeyRole};
use crate::kind::Kind;
use crate::traits::SignaturePrimitive;
use crate::validator;

/// Outcome of verifying a container
#[derive(Debug, Clone)]
pub struct Verification {
    /// Unpacked container contents (original file name and payload)
    pub container: SignedContainer,
    /// `false` means the signature does not match, which is not an error
    pub valid: bool,
}

pub struct Orchestrator<P> {
    primitive: P,
}

impl<P: SignaturePrimitive> Orchestrator<P> {
    pub fn new(primitive: P) -> Self {
        Self { primitive }
    }

    /// Generate a key pair for `kind`
    ///
    /// # Errors
    /// - `KeyGenerationFailed` wrapping any primitive error
    /// - `BackendUnavailable` if the primitive could not initialise
    pub fn generate_keys(&self, kind: Kind) -> Result<KeyPair> {
        let (public_key, private_key) = self
            .primitive
            .generate_keys(kind)
            .map_err(|e| wrap(e, DigisignError::KeyGenerationFailed))?;

        let pair = KeyPair {
            public: KeyMaterial::new(kind, KeyRole::Public, public_key)
                .map_err(|e| DigisignError::KeyGenerationFailed(e.to_string()))?,
            private: KeyMaterial::new(kind, KeyRole::Private, private_key)
                .map_err(|e| DigisignError::KeyGenerationFailed(e.to_string()))?,
        };

        tracing::info!(
            "Generated {} key pair, public fingerprint {}",
            kind,
            pair.public.fingerprint()
        );

        Ok(pair)
    }

    /// Sign `payload` and pack it into a container under `filename`
    ///
    /// # Steps
    /// 1. validate the private key text
    /// 2. sign the payload with the primitive
    /// 3. hex-encode the signature
    /// 4. pack filename, payload and signature text
    pub fn sign(
        &self,
        filename: &str,
        payload: &[u8],
        private_key_text: &str,
        kind: Kind,
    ) -> Result<Vec<u8>> {
        let signature_text = self.sign_detached(payload, private_key_text, kind)?;
        let packed = container::pack(filename, payload, &signature_text)?;

        tracing::info!(
            "Signed {:?} ({} bytes) with {}, container {} bytes",
            filename,
            payload.len(),
            kind,
            packed.len()
        );

        Ok(packed)
    }

    /// Sign `payload` and return the hex signature without a container
    pub fn sign_detached(&self, payload: &[u8], private_key_text: &str, kind: Kind) -> Result<String> {
        let key = validator::validate(private_key_text, KeyRole::Private, kind)?;

        let signature = self
            .primitive
            .sign(payload, key.as_bytes(), kind)
            .map_err(|e| wrap(e, DigisignError::SigningFailed))?;

        Ok(bytes_to_hex(&signature))
    }

    /// Check a container against a public key
    pub fn verify(&self, container_bytes: &[u8], public_key_text: &str, kind: Kind) -> Result<bool> {
        Ok(self.open(container_bytes, public_key_text, kind)?.valid)
    }

    /// Unpack and verify a container, handing back its contents
    ///
    /// # Steps
    /// 1. unpack the container
    /// 2. validate the public key text
    /// 3. hex-decode the signature text
    /// 4. verify with the primitive
    pub fn open(
        &self,
        container_bytes: &[u8],
        public_key_text: &str,
        kind: Kind,
    ) -> Result<Verification> {
        let container = container::unpack(container_bytes)?;
        let valid = self.verify_detached(
            &container.signature_text,
            &container.payload,
            public_key_text,
            kind,
        )?;

        if valid {
            tracing::info!("Signature of {:?} is valid ({})", container.filename, kind);
        } else {
            tracing::warn!("Signature of {:?} does not match ({})", container.filename, kind);
        }

        Ok(Verification { container, valid })
    }

    /// Verify a hex signature over `payload`
    ///
    /// `signature_hex` is decoded as given; surrounding whitespace is a
    /// `MalformedEncoding` error like any other non-hex character.
    pub fn verify_detached(
        &self,
        signature_hex: &str,
        payload: &[u8],
        public_key_text: &str,
        kind: Kind,
    ) -> Result<bool> {
        let key = validator::validate(public_key_text, KeyRole::Public, kind)?;
        let signature = hex_to_bytes(signature_hex)?;

        self.primitive
            .verify(&signature, payload, key.as_bytes(), kind)
            .map_err(|e| wrap(e, DigisignError::VerificationFailed))
    }
}

/// Wrap a primitive error into `variant` unless it already is one of the
/// primitive-facing kinds
fn wrap(err: DigisignError, variant: fn(String) -> DigisignError) -> DigisignError {
    match err {
        DigisignError::SigningFailed(_)
        | DigisignError::VerificationFailed(_)
        | DigisignError::KeyGenerationFailed(_)
        | DigisignError::BackendUnavailable(_) => err,
        other => variant(other.to_string()),
    }
}
