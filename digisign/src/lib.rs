//! Post-quantum signed containers
//!
//! Packs a document, its original file name and a Dilithium signature into
//! one self-describing blob, and persists keys as PEM text. Every key and
//! container is validated before any cryptographic check runs.
//!
//! # Quick Start
//!
//! ```rust
//! use digisign::{DilithiumPrimitive, Kind, Orchestrator};
//!
//! let orchestrator = Orchestrator::new(DilithiumPrimitive::new());
//!
//! // Generate keypair and export it as PEM text
//! let keys = orchestrator.generate_keys(Kind::Dilithium2).unwrap();
//! let private_pem = keys.private.to_pem();
//! let public_pem = keys.public.to_pem();
//!
//! // Sign into a container
//! let signed = orchestrator
//!     .sign("hello.txt", b"hello world", &private_pem, Kind::Dilithium2)
//!     .unwrap();
//!
//! // Verify the container
//! let is_valid = orchestrator.verify(&signed, &public_pem, Kind::Dilithium2).unwrap();
//! assert!(is_valid);
//! ```

pub mod container;
pub mod dilithium;
pub mod encoding;
pub mod error;
pub mod key;
pub mod kind;
pub mod orchestrator;
pub mod pem;
pub mod traits;
pub mod validator;

// Re-export commonly used types
pub use container::{pack, unpack, SignedContainer, MAGIC};
pub use dilithium::{AlgorithmInfo, DilithiumPrimitive};
pub use error::{DigisignError, Result};
pub use key::{KeyMaterial, KeyPair, KeyRole, MIN_KEY_LEN};
pub use kind::Kind;
pub use orchestrator::{Orchestrator, Verification};
pub use traits::SignaturePrimitive;
pub use validator::validate;
