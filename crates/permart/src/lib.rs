#![forbid(unsafe_code)]

//! Verification of signed UA permission artifacts.
//!
//! Re-exports the workspace crates and carries the command-line tool's
//! configuration file support.

pub use permart_artifact as artifact;
pub use permart_c14n as c14n;
pub use permart_core as core;
pub use permart_crypto as crypto;
pub use permart_dsig as dsig;
pub use permart_keys as keys;
pub use permart_xml as xml;

pub mod config;

pub use permart_artifact::{set_permission_artifact, Handle, Lifecycle};
pub use permart_core::{Error, ErrorKind, Result};
