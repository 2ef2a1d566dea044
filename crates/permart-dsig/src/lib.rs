#![forbid(unsafe_code)]

//! Enveloped XML-Signature verification for UA permission artifacts.
//!
//! Checks the RSA-SHA1 signature over SignedInfo, then the SHA-1 digest of
//! the permission body against the <DigestValue> inside SignedInfo.

pub mod context;
pub mod encoding;
pub mod verify;

pub use context::VerifyContext;
pub use encoding::{decode_base64, encode_base64};
pub use verify::{
    pre_digest_body, pre_digest_signed_info, signed_spans, verify, SignedSpans, Verified,
};
