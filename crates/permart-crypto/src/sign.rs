#![forbid(unsafe_code)]

//! Signature verification over a precomputed digest.

use crate::digest::DIGEST_LEN;
use permart_core::{algorithm, Error};

/// Public key material for signature checks.
#[derive(Debug, Clone)]
pub enum VerifyingKey {
    RsaPublic(rsa::RsaPublicKey),
}

/// Trait for signature algorithms.
///
/// `verify_digest` takes the raw digest the issuer signed, not the message.
/// `Ok(false)` means the signature is well formed but does not match.
pub trait SignatureAlgorithm: Send + Sync {
    fn uri(&self) -> &'static str;
    fn verify_digest(&self, key: &VerifyingKey, digest: &[u8], signature: &[u8])
        -> Result<bool, Error>;
}

// ── RSA PKCS#1 v1.5 with SHA-1 ───────────────────────────────────────

/// RSA PKCS#1 v1.5 over a SHA-1 digest, the scheme artifact issuers use.
#[derive(Debug, Default, Clone, Copy)]
pub struct RsaPkcs1v15Sha1;

impl SignatureAlgorithm for RsaPkcs1v15Sha1 {
    fn uri(&self) -> &'static str {
        algorithm::RSA_SHA1
    }

    fn verify_digest(
        &self,
        key: &VerifyingKey,
        digest: &[u8],
        sig_bytes: &[u8],
    ) -> Result<bool, Error> {
        use signature::hazmat::PrehashVerifier;

        if digest.len() != DIGEST_LEN {
            return Err(Error::InvalidAuth(format!(
                "SHA-1 digest must be {DIGEST_LEN} bytes, got {}",
                digest.len()
            )));
        }
        let VerifyingKey::RsaPublic(public_key) = key;
        let sig = rsa::pkcs1v15::Signature::try_from(sig_bytes)
            .map_err(|e| Error::InvalidAuth(format!("invalid RSA signature: {e}")))?;
        let vk = rsa::pkcs1v15::VerifyingKey::<sha1::Sha1>::new(public_key.clone());
        Ok(vk.verify_prehash(digest, &sig).is_ok())
    }
}
