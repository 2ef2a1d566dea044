#![forbid(unsafe_code)]

//! Namespace, element and attribute names of the permission artifact schema.

/// XML Digital Signature namespace
pub const DSIG: &str = "http://www.w3.org/2000/09/xmldsig#";

/// The `SignedInfo` start tag as the issuer digests it. Artifacts carry an
/// abbreviated `<SignedInfo>` that inherits the namespace from `Signature`;
/// canonical form spells the declaration out.
pub const SIGNED_INFO_C14N_START: &str =
    "<SignedInfo xmlns=\"http://www.w3.org/2000/09/xmldsig#\">";

// ── Element names ────────────────────────────────────────────────────

pub mod node {
    // DSig elements
    pub const SIGNATURE: &str = "Signature";
    pub const SIGNED_INFO: &str = "SignedInfo";
    pub const SIGNATURE_VALUE: &str = "SignatureValue";
    pub const DIGEST_VALUE: &str = "DigestValue";

    // Permission artifact elements
    pub const UA_PERMISSION: &str = "UAPermission";
    pub const UA_DETAILS: &str = "UADetails";
    pub const FLIGHT_PARAMETERS: &str = "FlightParameters";
    pub const COORDINATES: &str = "Coordinates";
    pub const COORDINATE: &str = "Coordinate";
}

// ── Attribute names ──────────────────────────────────────────────────

pub mod attr {
    pub const LATITUDE: &str = "latitude";
    pub const LONGITUDE: &str = "longitude";
    pub const MAX_ALTITUDE: &str = "maxAltitude";
    pub const UIN_NO: &str = "uinNo";
    pub const ADC_NUMBER: &str = "adcNumber";
    pub const FIC_NUMBER: &str = "ficNumber";
    pub const FLIGHT_START_TIME: &str = "flightStartTime";
    pub const FLIGHT_END_TIME: &str = "flightEndTime";
}
