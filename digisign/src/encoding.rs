//! Hex and Base64 transcoders
//!
//! Signatures cross every boundary as lowercase hex text; key bytes are
//! carried inside PEM envelopes as standard, padded Base64.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::Result;

/// Lowercase, zero-padded, two digits per byte, no separators
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Exact inverse of [`bytes_to_hex`]
///
/// # Errors
/// - `MalformedEncoding` on odd length or any non-hex character
pub fn hex_to_bytes(text: &str) -> Result<Vec<u8>> {
    Ok(hex::decode(text)?)
}

pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Standard alphabet, `=` padding required
///
/// # Errors
/// - `MalformedEncoding` on invalid characters, bad padding or
///   non-canonical trailing bits
pub fn decode_base64(text: &str) -> Result<Vec<u8>> {
    Ok(STANDARD.decode(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DigisignError;

    #[test]
    fn test_hex_is_lowercase_and_padded() {
        assert_eq!(bytes_to_hex(&[0x00, 0x0f, 0xab, 0xff]), "000fabff");
        assert_eq!(bytes_to_hex(&[]), "");
    }

    #[test]
    fn test_hex_roundtrip_all_byte_values() {
        let bytes: Vec<u8> = (0..=255u8).collect();
        let text = bytes_to_hex(&bytes);

        assert_eq!(text.len(), 512);
        assert!(!text.chars().any(|c| c.is_ascii_uppercase()));
        assert_eq!(hex_to_bytes(&text).unwrap(), bytes);
    }

    #[test]
    fn test_hex_rejects_odd_length() {
        match hex_to_bytes("abc") {
            Err(DigisignError::MalformedEncoding(msg)) => assert!(msg.contains("hex")),
            other => panic!("Expected MalformedEncoding, got {:?}", other),
        }
    }

    #[test]
    fn test_hex_rejects_non_hex_characters() {
        assert!(matches!(
            hex_to_bytes("zz00"),
            Err(DigisignError::MalformedEncoding(_))
        ));
        assert!(matches!(
            hex_to_bytes("00 1"),
            Err(DigisignError::MalformedEncoding(_))
        ));
    }

    #[test]
    fn test_base64_roundtrip() {
        let bytes = b"post-quantum key material".to_vec();
        let text = encode_base64(&bytes);

        assert!(text.ends_with('='));
        assert_eq!(decode_base64(&text).unwrap(), bytes);
    }

    #[test]
    fn test_base64_rejects_garbage() {
        assert!(matches!(
            decode_base64("not*base64!"),
            Err(DigisignError::MalformedEncoding(_))
        ));
        // Missing padding
        assert!(matches!(
            decode_base64("YWJj ZA"),
            Err(DigisignError::MalformedEncoding(_))
        ));
        assert!(matches!(
            decode_base64("YWJjZA"),
            Err(DigisignError::MalformedEncoding(_))
        ));
    }
}
