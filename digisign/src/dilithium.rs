//! Dilithium post-quantum digital signature primitive
//!
//! # About Dilithium
//!
//! Dilithium (standardised by NIST as ML-DSA, FIPS 204) is a lattice-based
//! signature scheme built on the Module-LWE problem. Three parameter sets
//! are exposed through [`Kind`]:
//!
//! | Kind | NIST Level | Public Key | Signature |
//! |------|------------|------------|-----------|
//! | Dilithium2 | 2 | 1,312 bytes | ~2,420 bytes |
//! | Dilithium3 | 3 | 1,952 bytes | ~3,293 bytes |
//! | Dilithium5 | 5 | 2,592 bytes | ~4,595 bytes |
//!
//! Signatures are detached: the signed message is never embedded in the
//! signature bytes, the container carries the payload separately.
//!
//! # Backend initialisation
//!
//! The first call into the primitive runs a self test (keypair, sign,
//! verify for every parameter set). The outcome is cached for the life of
//! the process. A failed self test is never retried and every caller gets
//! the same `BackendUnavailable` error.

use std::sync::OnceLock;
use std::time::Instant;

use pqcrypto_traits::sign::{DetachedSignature as _, PublicKey as _, SecretKey as _};

use crate::error::{DigisignError, Result};
use crate::kind::Kind;
use crate::traits::{RawKeyPair, SignaturePrimitive};

/// Run `$body` with `$scheme` bound to the pqcrypto module for `$kind`
macro_rules! with_scheme {
    ($kind:expr, $scheme:ident => $body:expr) => {
        match $kind {
            Kind::Dilithium2 => {
                use pqcrypto_dilithium::dilithium2 as $scheme;
                $body
            }
            Kind::Dilithium3 => {
                use pqcrypto_dilithium::dilithium3 as $scheme;
                $body
            }
            Kind::Dilithium5 => {
                use pqcrypto_dilithium::dilithium5 as $scheme;
                $body
            }
        }
    };
}

const SELF_TEST_MESSAGE: &[u8] = b"digisign backend self test";

static BACKEND: OnceLock<std::result::Result<(), String>> = OnceLock::new();

/// Initialise the backend once per process and return the cached outcome
///
/// # Errors
/// - `BackendUnavailable` if the one-time self test failed
pub fn ensure_backend() -> Result<()> {
    BACKEND
        .get_or_init(run_self_test)
        .clone()
        .map_err(DigisignError::BackendUnavailable)
}

fn run_self_test() -> std::result::Result<(), String> {
    let started = Instant::now();

    for kind in Kind::ALL {
        let (public_key, secret_key) = raw_keypair(kind);
        let signature = raw_sign(kind, SELF_TEST_MESSAGE, &secret_key)
            .map_err(|e| format!("{} self test could not sign: {}", kind, e))?;
        let valid = raw_verify(kind, &signature, SELF_TEST_MESSAGE, &public_key)
            .map_err(|e| format!("{} self test could not verify: {}", kind, e))?;

        if !valid {
            tracing::warn!("Dilithium backend self test rejected its own signature ({})", kind);
            return Err(format!("{} self test signature did not verify", kind));
        }
    }

    tracing::info!(
        "Dilithium backend initialised: self test passed in {} ms",
        started.elapsed().as_millis()
    );

    Ok(())
}

fn raw_keypair(kind: Kind) -> RawKeyPair {
    with_scheme!(kind, scheme => {
        let (pk, sk) = scheme::keypair();
        (pk.as_bytes().to_vec(), sk.as_bytes().to_vec())
    })
}

fn raw_sign(kind: Kind, message: &[u8], private_key: &[u8]) -> Result<Vec<u8>> {
    with_scheme!(kind, scheme => {
        let sk = scheme::SecretKey::from_bytes(private_key).map_err(|e| {
            DigisignError::SigningFailed(format!(
                "Failed to parse {} secret key ({} bytes): {:?}",
                kind,
                private_key.len(),
                e
            ))
        })?;
        Ok(scheme::detached_sign(message, &sk).as_bytes().to_vec())
    })
}

fn raw_verify(kind: Kind, signature: &[u8], message: &[u8], public_key: &[u8]) -> Result<bool> {
    with_scheme!(kind, scheme => {
        let pk = scheme::PublicKey::from_bytes(public_key).map_err(|e| {
            DigisignError::VerificationFailed(format!(
                "Failed to parse {} public key ({} bytes): {:?}",
                kind,
                public_key.len(),
                e
            ))
        })?;

        // A signature of impossible length simply does not match
        let sig = match scheme::DetachedSignature::from_bytes(signature) {
            Ok(sig) => sig,
            Err(e) => {
                tracing::warn!(
                    "Rejecting {} signature of {} bytes: {:?}",
                    kind,
                    signature.len(),
                    e
                );
                return Ok(false);
            }
        };

        Ok(scheme::verify_detached_signature(&sig, message, &pk).is_ok())
    })
}

/// Dilithium primitive backed by `pqcrypto-dilithium`
#[derive(Debug, Clone, Copy, Default)]
pub struct DilithiumPrimitive;

impl DilithiumPrimitive {
    pub fn new() -> Self {
        Self
    }

    /// Return algorithm information
    pub fn algorithm_info(kind: Kind) -> AlgorithmInfo {
        with_scheme!(kind, scheme => AlgorithmInfo {
            name: match kind {
                Kind::Dilithium2 => "Dilithium2",
                Kind::Dilithium3 => "Dilithium3",
                Kind::Dilithium5 => "Dilithium5",
            },
            nist_level: kind.level(),
            public_key_size: scheme::public_key_bytes(),
            secret_key_size: scheme::secret_key_bytes(),
            signature_size: scheme::signature_bytes(),
        })
    }
}

impl SignaturePrimitive for DilithiumPrimitive {
    /// Generate new keypair for `kind`
    ///
    /// # Performance
    /// - Average time: ~10-20 ms (depends on system entropy source)
    fn generate_keys(&self, kind: Kind) -> Result<RawKeyPair> {
        ensure_backend()?;

        let (public_key, secret_key) = raw_keypair(kind);

        tracing::info!(
            "Generated {} keypair: pk_len={} bytes, sk_len={} bytes",
            kind,
            public_key.len(),
            secret_key.len()
        );

        Ok((public_key, secret_key))
    }

    /// # Errors
    /// - `SigningFailed` if the secret key has the wrong length for `kind`
    fn sign(&self, message: &[u8], private_key: &[u8], kind: Kind) -> Result<Vec<u8>> {
        ensure_backend()?;

        let signature = raw_sign(kind, message, private_key)?;

        tracing::debug!(
            "Signed message: kind={}, msg_len={} bytes, sig_len={} bytes",
            kind,
            message.len(),
            signature.len()
        );

        Ok(signature)
    }

    /// # Returns
    /// - `Ok(true)`: signature is valid
    /// - `Ok(false)`: signature does not match (or cannot be a signature of `kind`)
    /// - `Err(VerificationFailed)`: the public key is unusable for `kind`
    fn verify(
        &self,
        signature: &[u8],
        message: &[u8],
        public_key: &[u8],
        kind: Kind,
    ) -> Result<bool> {
        ensure_backend()?;

        let is_valid = raw_verify(kind, signature, message, public_key)?;

        tracing::debug!(
            "Signature verification: kind={}, valid={}, msg_len={} bytes",
            kind,
            is_valid,
            message.len()
        );

        Ok(is_valid)
    }

    fn algorithm_name(&self, kind: Kind) -> String {
        Self::algorithm_info(kind).name.to_string()
    }
}

/// Algorithm information structure
#[derive(Debug, Clone, Copy)]
pub struct AlgorithmInfo {
    /// Algorithm name
    pub name: &'static str,
    /// NIST security level
    pub nist_level: u8,
    /// Public key size (bytes)
    pub public_key_size: usize,
    /// Secret key size (bytes)
    pub secret_key_size: usize,
    /// Maximum signature size (bytes)
    pub signature_size: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_initialises_once() {
        assert!(ensure_backend().is_ok());
        assert!(ensure_backend().is_ok());
        assert!(matches!(BACKEND.get(), Some(Ok(()))));
    }

    #[test]
    fn test_keypair_sizes_match_info() {
        let primitive = DilithiumPrimitive::new();

        for kind in Kind::ALL {
            let (pk, sk) = primitive.generate_keys(kind).unwrap();
            let info = DilithiumPrimitive::algorithm_info(kind);

            assert_eq!(pk.len(), info.public_key_size);
            assert_eq!(sk.len(), info.secret_key_size);
        }
    }

    #[test]
    fn test_sign_and_verify() {
        let primitive = DilithiumPrimitive::new();
        let (pk, sk) = primitive.generate_keys(Kind::Dilithium2).unwrap();

        let message = b"Contract v2, signed by both parties";
        let signature = primitive.sign(message, &sk, Kind::Dilithium2).unwrap();
        assert!(signature.len() <= DilithiumPrimitive::algorithm_info(Kind::Dilithium2).signature_size);

        assert!(primitive
            .verify(&signature, message, &pk, Kind::Dilithium2)
            .unwrap());
        assert!(!primitive
            .verify(&signature, b"Tampered message", &pk, Kind::Dilithium2)
            .unwrap());
    }

    #[test]
    fn test_sign_with_malformed_key() {
        let primitive = DilithiumPrimitive::new();

        match primitive.sign(b"test message", &[0u8; 100], Kind::Dilithium3) {
            Err(DigisignError::SigningFailed(msg)) => {
                assert!(msg.contains("secret key"));
            }
            other => panic!("Expected SigningFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_verify_with_wrong_kind_key() {
        let primitive = DilithiumPrimitive::new();
        let (pk, sk) = primitive.generate_keys(Kind::Dilithium2).unwrap();
        let signature = primitive.sign(b"msg", &sk, Kind::Dilithium2).unwrap();

        // A Dilithium2 public key has the wrong length for Dilithium5
        assert!(matches!(
            primitive.verify(&signature, b"msg", &pk, Kind::Dilithium5),
            Err(DigisignError::VerificationFailed(_))
        ));
    }

    #[test]
    fn test_verify_oversized_signature_is_negative() {
        let primitive = DilithiumPrimitive::new();
        let (pk, _) = primitive.generate_keys(Kind::Dilithium2).unwrap();
        let info = DilithiumPrimitive::algorithm_info(Kind::Dilithium2);

        let bogus = vec![0u8; info.signature_size + 1];
        assert!(!primitive
            .verify(&bogus, b"msg", &pk, Kind::Dilithium2)
            .unwrap());
    }

    #[test]
    fn test_algorithm_info() {
        let info = DilithiumPrimitive::algorithm_info(Kind::Dilithium3);

        assert_eq!(info.name, "Dilithium3");
        assert_eq!(info.nist_level, 3);
        assert_eq!(info.public_key_size, 1952);
        assert_eq!(DilithiumPrimitive::algorithm_info(Kind::Dilithium2).public_key_size, 1312);
        assert_eq!(DilithiumPrimitive::algorithm_info(Kind::Dilithium5).public_key_size, 2592);
        assert_eq!(DilithiumPrimitive.algorithm_name(Kind::Dilithium5), "Dilithium5");
    }
}
