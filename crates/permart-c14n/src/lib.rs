#![forbid(unsafe_code)]

//! Canonicalization for permission artifacts.
//!
//! Artifact issuers digest the permission body and `SignedInfo` after
//! Canonical XML 1.0. For the narrow artifact schema (no comments, no
//! namespace rewriting, attributes already in order, no insignificant
//! whitespace inside the signed region) the only visible difference between
//! the serialized bytes and their canonical form is empty-element expansion,
//! which is what this crate implements.

pub mod expand;

pub use expand::{canonicalize, MAX_TAG_NAME};
