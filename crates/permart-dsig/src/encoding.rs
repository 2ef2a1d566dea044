#![forbid(unsafe_code)]

//! Base64 as it appears in artifacts: `SignatureValue`, `DigestValue` and the
//! transport encoding of the artifact itself.

use base64::Engine;

/// Decode standard base64, ignoring embedded whitespace and line breaks.
pub fn decode_base64(data: &[u8]) -> Result<Vec<u8>, base64::DecodeError> {
    let clean: Vec<u8> = data
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    base64::engine::general_purpose::STANDARD.decode(clean)
}

pub fn encode_base64(data: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(data)
}
