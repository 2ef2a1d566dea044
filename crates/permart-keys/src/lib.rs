#![forbid(unsafe_code)]

//! Issuer key handling for the permission artifact verifier.
//!
//! Loads the issuing server's RSA public key from PEM (SPKI or PKCS#1) or
//! DER. Private keys are refused.

pub mod key;
pub mod loader;

pub use key::{Key, KeyData};
pub use loader::{load_key_file, load_public_key};
