#![forbid(unsafe_code)]

//! Shared types for the permission artifact verifier: the error taxonomy,
//! its status codes, algorithm URIs, and the schema's element and attribute
//! names.

pub mod algorithm;
pub mod error;
pub mod ns;

pub use error::{Error, ErrorKind, Result};
