//! Signed container codec
//!
//! One self-describing blob carrying the payload, its original file name
//! and the hex signature text. All integers are unsigned 32-bit
//! little-endian:
//!
//! ```text
//! offset 0          : 12 bytes  magic "DIGI_SIGN_v1"
//! offset 12         : 4 bytes   filename length (N1)
//! offset 16         : N1 bytes  filename (UTF-8)
//! offset 16+N1      : 4 bytes   payload length (N2)
//! offset 20+N1      : N2 bytes  payload
//! offset 20+N1+N2   : 4 bytes   signature text length (N3)
//! offset 24+N1+N2   : N3 bytes  signature text (UTF-8 hex)
//! ```
//!
//! Bytes after the signature text are ignored so later versions can
//! append fields without breaking older readers.

use crate::error::{DigisignError, Result};

/// Leading marker of every container
pub const MAGIC: &[u8; 12] = b"DIGI_SIGN_v1";

/// Suffix appended to the name of a signed file
pub const SIGNED_EXTENSION: &str = "signed";

const LEN_PREFIX: usize = 4;

/// Unpacked contents of a signed container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedContainer {
    pub filename: String,
    pub payload: Vec<u8>,
    pub signature_text: String,
}

impl SignedContainer {
    pub fn new(
        filename: impl Into<String>,
        payload: impl Into<Vec<u8>>,
        signature_text: impl Into<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            payload: payload.into(),
            signature_text: signature_text.into(),
        }
    }

    /// Exact size of the packed form
    pub fn encoded_len(&self) -> usize {
        MAGIC.len()
            + LEN_PREFIX
            + self.filename.len()
            + LEN_PREFIX
            + self.payload.len()
            + LEN_PREFIX
            + self.signature_text.len()
    }

    pub fn pack(&self) -> Result<Vec<u8>> {
        pack(&self.filename, &self.payload, &self.signature_text)
    }
}

/// Serialize the three fields into container bytes
///
/// # Errors
/// - `ContainerTooLarge` if a field does not fit a 32-bit length prefix
pub fn pack(filename: &str, payload: &[u8], signature_text: &str) -> Result<Vec<u8>> {
    let fields: [(&'static str, &[u8]); 3] = [
        ("filename", filename.as_bytes()),
        ("payload", payload),
        ("signature", signature_text.as_bytes()),
    ];

    let total = MAGIC.len()
        + fields
            .iter()
            .map(|(_, bytes)| LEN_PREFIX + bytes.len())
            .sum::<usize>();

    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(MAGIC);

    for (field, bytes) in fields {
        let len = u32::try_from(bytes.len()).map_err(|_| DigisignError::ContainerTooLarge {
            field,
            len: bytes.len(),
        })?;
        out.extend_from_slice(&len.to_le_bytes());
        out.extend_from_slice(bytes);
    }

    tracing::debug!(
        "Packed container: filename_len={}, payload_len={}, signature_len={}, total={} bytes",
        filename.len(),
        payload.len(),
        signature_text.len(),
        out.len()
    );

    Ok(out)
}

/// Parse container bytes back into their three fields
///
/// Declared lengths come from untrusted input and are checked against the
/// bytes actually remaining before any slicing.
///
/// # Errors
/// - `BadMagic` if the buffer does not start with [`MAGIC`]
/// - `TruncatedContainer` if a length prefix or field runs past the end
/// - `MalformedEncoding` if the filename or signature text is not UTF-8
pub fn unpack(buffer: &[u8]) -> Result<SignedContainer> {
    if buffer.len() < MAGIC.len() || &buffer[..MAGIC.len()] != MAGIC {
        return Err(DigisignError::BadMagic);
    }

    let mut reader = FieldReader {
        buf: buffer,
        offset: MAGIC.len(),
    };

    let filename = reader.read_field("filename")?;
    let payload = reader.read_field("payload")?;
    let signature = reader.read_field("signature")?;

    let trailing = buffer.len() - reader.offset;
    if trailing > 0 {
        tracing::debug!("Ignoring {} trailing bytes after signature field", trailing);
    }

    Ok(SignedContainer {
        filename: utf8_field("filename", filename)?,
        payload: payload.to_vec(),
        signature_text: utf8_field("signature", signature)?,
    })
}

/// Quick check used to tell containers apart from ordinary files
pub fn looks_signed(data: &[u8]) -> bool {
    data.starts_with(MAGIC)
}

/// `report.pdf` -> `report.pdf.signed`
pub fn signed_file_name(name: &str) -> String {
    format!("{}.{}", name, SIGNED_EXTENSION)
}

/// `report.pdf.signed` -> `report.pdf`; other names are returned unchanged
pub fn original_file_name(name: &str) -> &str {
    name.strip_suffix(SIGNED_EXTENSION)
        .and_then(|stem| stem.strip_suffix('.'))
        .filter(|stem| !stem.is_empty())
        .unwrap_or(name)
}

struct FieldReader<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> FieldReader<'a> {
    fn take(&mut self, field: &'static str, needed: usize) -> Result<&'a [u8]> {
        let remaining = self.buf.len() - self.offset;
        if needed > remaining {
            return Err(DigisignError::TruncatedContainer {
                field,
                needed,
                remaining,
            });
        }

        let slice = &self.buf[self.offset..self.offset + needed];
        self.offset += needed;
        Ok(slice)
    }

    fn read_field(&mut self, field: &'static str) -> Result<&'a [u8]> {
        let prefix = self.take(field, LEN_PREFIX)?;
        let len = u32::from_le_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]) as usize;
        self.take(field, len)
    }
}

fn utf8_field(field: &'static str, bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec())
        .map_err(|e| DigisignError::MalformedEncoding(format!("{} is not UTF-8: {}", field, e)))
}
