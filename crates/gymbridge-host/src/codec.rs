//! Marshalling between the guest's wire types and native types.
//!
//! The guest encodes text as UTF-16LE byte buffers (two bytes per code
//! unit), seeds as a presence flag plus a 64-bit value, and optional
//! row sequences as packed length-prefixed records. Every conversion
//! here is pure and stateless; malformed input is a fatal
//! [`CodecError`].

pub use crate::error::CodecError;

/// Decode a UTF-16LE byte buffer into native text.
///
/// # Errors
///
/// Returns [`CodecError::OddLength`] for buffers that do not split into
/// two-byte code units and [`CodecError::UnpairedSurrogate`] for
/// ill-formed surrogate sequences.
pub fn decode_text(bytes: &[u8]) -> Result<String, CodecError> {
    if bytes.len() % 2 != 0 {
        return Err(CodecError::OddLength(bytes.len()));
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).map_err(|_| CodecError::UnpairedSurrogate)
}

/// Encode native text as a UTF-16LE byte buffer.
#[must_use]
pub fn encode_text(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(u16::to_le_bytes).collect()
}

/// Decode a packed row sequence: repeated `(u32 LE byte length,
/// UTF-16LE payload)` records, in order.
///
/// An empty buffer decodes to an empty sequence; absence of the whole
/// sequence is signalled out of band by the wire flag, not here.
///
/// # Errors
///
/// Returns [`CodecError::TruncatedRows`] when the buffer ends inside a
/// record, or a text error for a malformed payload.
pub fn decode_rows(bytes: &[u8]) -> Result<Vec<String>, CodecError> {
    let mut rows = Vec::new();
    let mut offset = 0usize;
    while offset < bytes.len() {
        let header = bytes
            .get(offset..offset + 4)
            .ok_or(CodecError::TruncatedRows(offset))?;
        let len = u32::from_le_bytes([header[0], header[1], header[2], header[3]]) as usize;
        offset += 4;
        let payload = bytes
            .get(offset..offset + len)
            .ok_or(CodecError::TruncatedRows(offset))?;
        rows.push(decode_text(payload)?);
        offset += len;
    }
    Ok(rows)
}

/// Encode a row sequence in the packed wire format.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn encode_rows<S: AsRef<str>>(rows: &[S]) -> Vec<u8> {
    let mut bytes = Vec::new();
    for row in rows {
        let payload = encode_text(row.as_ref());
        bytes.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&payload);
    }
    bytes
}

/// Interpret the optional-seed wire pair. Absence is a distinct wire
/// state from a zero seed.
#[must_use]
pub fn decode_seed(has_seed: u32, seed: u64) -> Option<u64> {
    (has_seed != 0).then_some(seed)
}
