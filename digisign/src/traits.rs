/// Interface to the post-quantum signature primitive
use crate::error::Result;
use crate::kind::Kind;

/// Raw `(public_key, private_key)` bytes
pub type RawKeyPair = (Vec<u8>, Vec<u8>);

/// Key generation, signing and verification for one scheme family
///
/// The orchestrator never touches the scheme's mathematics; it only calls
/// through this trait, so tests can inject a stub.
pub trait SignaturePrimitive: Send + Sync {
    /// Generate keypair
    fn generate_keys(&self, kind: Kind) -> Result<RawKeyPair>;

    /// Detached signature over `message`
    fn sign(&self, message: &[u8], private_key: &[u8], kind: Kind) -> Result<Vec<u8>>;

    /// `Ok(false)` means the signature does not match; `Err` means the
    /// primitive itself could not run
    fn verify(&self, signature: &[u8], message: &[u8], public_key: &[u8], kind: Kind)
        -> Result<bool>;

    /// Algorithm name
    fn algorithm_name(&self, kind: Kind) -> String;
}
