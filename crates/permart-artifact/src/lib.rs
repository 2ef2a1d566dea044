#![forbid(unsafe_code)]

//! UA permission artifact ingestion.
//!
//! A [`Handle`] takes the raw (optionally base64 encoded) artifact, verifies
//! its enveloped signature against the issuer key, and extracts the geofence
//! and flight parameters the flight controller enforces.

pub mod fence;
pub mod handle;
pub mod params;

pub use fence::{Fence, Vertex};
pub use handle::{Handle, Lifecycle};
pub use params::{parse_ist_timestamp, FlightParams, RawDateTime};

use permart_core::Error;

/// Status code for a successful [`set_permission_artifact`].
pub const STATUS_OK: i8 = 0;

/// Status-code entry point for flight-control integration.
///
/// Returns [`STATUS_OK`] on success, otherwise the negative code of the
/// failing stage's [`permart_core::ErrorKind`].
pub fn set_permission_artifact(handle: Option<&mut Handle>, data: &[u8], is_base64: bool) -> i8 {
    let result = match handle {
        Some(handle) => handle.set(data, is_base64),
        None => Err(Error::UnallocatedHandle),
    };
    match result {
        Ok(()) => STATUS_OK,
        Err(e) => e.status_code(),
    }
}
