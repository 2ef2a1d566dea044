#![forbid(unsafe_code)]

//! Verification context: the configured issuer key and options.

use permart_crypto::{RsaPkcs1v15Sha1, SignatureAlgorithm};
use permart_keys::Key;

/// Context for permission artifact verification.
pub struct VerifyContext {
    /// The issuing server's public key.
    pub key: Key,
    /// Signature scheme applied to the SignedInfo digest.
    pub algorithm: Box<dyn SignatureAlgorithm>,
    /// Debug mode: log canonical pre-digest bytes at trace level.
    pub debug: bool,
}

impl VerifyContext {
    /// Create a context that checks RSA-SHA1 signatures against `key`.
    pub fn new(key: Key) -> Self {
        Self {
            key,
            algorithm: Box::new(RsaPkcs1v15Sha1),
            debug: false,
        }
    }

    /// Replace the signature scheme.
    pub fn with_algorithm(mut self, algorithm: Box<dyn SignatureAlgorithm>) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

impl std::fmt::Debug for VerifyContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerifyContext")
            .field("key", &self.key)
            .field("algorithm", &self.algorithm.uri())
            .field("debug", &self.debug)
            .finish()
    }
}
