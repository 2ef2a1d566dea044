#![forbid(unsafe_code)]

//! Cryptographic primitives for permission artifact verification: the
//! streaming digest fed by the canonicalizer, and signature checks over a
//! precomputed digest.

pub mod digest;
pub mod sign;

pub use digest::{Sha1Digest, DIGEST_LEN};
pub use sign::{RsaPkcs1v15Sha1, SignatureAlgorithm, VerifyingKey};
