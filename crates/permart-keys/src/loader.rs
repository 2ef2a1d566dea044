#![forbid(unsafe_code)]

//! Issuer key loading from PEM and DER.

use crate::key::{Key, KeyData};
use permart_core::Error;

/// Load an RSA public key from PEM data.
pub fn load_rsa_public_pem(pem_data: &[u8]) -> Result<Key, Error> {
    use pkcs8::DecodePublicKey;
    let pem_str = std::str::from_utf8(pem_data)
        .map_err(|e| Error::Key(format!("invalid PEM encoding: {e}")))?;
    let pem_str = pem_str.trim();

    if pem_str.contains("PRIVATE KEY-----") {
        return Err(Error::Key(
            "private key supplied; verification needs the issuer's public key".into(),
        ));
    }

    // Try SPKI first
    if let Ok(pk) = rsa::RsaPublicKey::from_public_key_pem(pem_str) {
        return Ok(Key::new(KeyData::Rsa { public: pk }));
    }

    // Try PKCS#1
    use pkcs1::DecodeRsaPublicKey;
    let pk = rsa::RsaPublicKey::from_pkcs1_pem(pem_str)
        .map_err(|e| Error::Key(format!("failed to parse RSA public key PEM: {e}")))?;
    Ok(Key::new(KeyData::Rsa { public: pk }))
}

/// Load an RSA public key from DER data (SubjectPublicKeyInfo or PKCS#1).
pub fn load_rsa_public_der(der: &[u8]) -> Result<Key, Error> {
    use pkcs8::DecodePublicKey;

    // Try SPKI first
    if let Ok(pk) = rsa::RsaPublicKey::from_public_key_der(der) {
        return Ok(Key::new(KeyData::Rsa { public: pk }));
    }

    // Try PKCS#1
    use pkcs1::DecodeRsaPublicKey;
    let pk = rsa::RsaPublicKey::from_pkcs1_der(der)
        .map_err(|e| Error::Key(format!("failed to parse RSA public key DER: {e}")))?;
    Ok(Key::new(KeyData::Rsa { public: pk }))
}

/// Auto-detect PEM vs DER and load.
pub fn load_public_key(data: &[u8]) -> Result<Key, Error> {
    if data.trim_ascii_start().starts_with(b"-----BEGIN") {
        load_rsa_public_pem(data)
    } else {
        load_rsa_public_der(data)
    }
}

/// Load a key from a file, auto-detecting format. The key is named after
/// the file.
pub fn load_key_file(path: &std::path::Path) -> Result<Key, Error> {
    let data = std::fs::read(path)
        .map_err(|e| Error::Key(format!("{}: {e}", path.display())))?;
    let key = load_public_key(&data)?;
    log::debug!("loaded {} bit issuer key from {}", key.bits(), path.display());
    Ok(key.with_name(path.display().to_string()))
}
