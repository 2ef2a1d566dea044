#![forbid(unsafe_code)]

//! Key types and data structures.

use permart_crypto::VerifyingKey;
use rsa::traits::PublicKeyParts;

/// The underlying key data.
pub enum KeyData {
    Rsa { public: rsa::RsaPublicKey },
}

impl std::fmt::Debug for KeyData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rsa { public } => write!(f, "RSA public key ({} bits)", public.size() * 8),
        }
    }
}

/// The artifact issuer's public key.
#[derive(Debug)]
pub struct Key {
    /// Optional name, e.g. the file it was loaded from.
    pub name: Option<String>,
    /// The key data.
    pub data: KeyData,
}

impl Key {
    /// Create a new key.
    pub fn new(data: KeyData) -> Self {
        Self { name: None, data }
    }

    /// Set the key name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Convert to a `VerifyingKey` for use with the signature algorithms.
    pub fn to_verifying_key(&self) -> VerifyingKey {
        match &self.data {
            KeyData::Rsa { public } => VerifyingKey::RsaPublic(public.clone()),
        }
    }

    /// Modulus size in bits.
    pub fn bits(&self) -> usize {
        match &self.data {
            KeyData::Rsa { public } => public.size() * 8,
        }
    }
}
