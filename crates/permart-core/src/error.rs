#![forbid(unsafe_code)]

/// Errors produced while ingesting and verifying a permission artifact.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no handle supplied")]
    UnallocatedHandle,

    #[error("permission artifact already set on this handle")]
    AlreadySet,

    #[error("parse failed: {0}")]
    ParseFailed(String),

    #[error("invalid artifact structure: {0}")]
    InvalidArtifact(String),

    #[error("signature value missing: {0}")]
    InvalidSignature(String),

    #[error("artifact not signed by the configured issuer: {0}")]
    InvalidAuth(String),

    #[error("digest mismatch: {0}")]
    InvalidDigest(String),

    #[error("bad geofence: {0}")]
    BadFence(String),

    #[error("bad maximum altitude: {0}")]
    BadAltitude(String),

    #[error("invalid flight parameters: {0}")]
    InvalidFlightParams(String),

    #[error("key error: {0}")]
    Key(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// The status-code level view of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnallocatedHandle,
    AlreadySet,
    ParseFailed,
    InvalidArtifact,
    InvalidSignature,
    InvalidAuth,
    InvalidDigest,
    BadFence,
    BadAltitude,
    InvalidFlightParams,
}

impl ErrorKind {
    /// Negative status code reported across the flight-controller boundary.
    /// Zero is reserved for success.
    pub fn status_code(self) -> i8 {
        match self {
            Self::InvalidArtifact => -1,
            Self::InvalidAuth => -2,
            Self::AlreadySet => -4,
            Self::UnallocatedHandle => -5,
            Self::ParseFailed => -6,
            Self::InvalidSignature => -7,
            Self::InvalidDigest => -8,
            Self::InvalidFlightParams => -9,
            Self::BadFence => -10,
            Self::BadAltitude => -11,
        }
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnallocatedHandle => ErrorKind::UnallocatedHandle,
            Self::AlreadySet => ErrorKind::AlreadySet,
            Self::ParseFailed(_) => ErrorKind::ParseFailed,
            Self::InvalidArtifact(_) => ErrorKind::InvalidArtifact,
            Self::InvalidSignature(_) => ErrorKind::InvalidSignature,
            Self::InvalidAuth(_) => ErrorKind::InvalidAuth,
            Self::InvalidDigest(_) => ErrorKind::InvalidDigest,
            Self::BadFence(_) => ErrorKind::BadFence,
            Self::BadAltitude(_) => ErrorKind::BadAltitude,
            Self::InvalidFlightParams(_) => ErrorKind::InvalidFlightParams,
            // Key material, config and I/O failures happen before an artifact
            // is ever parsed; on the status-code surface they read as a parse
            // failure.
            Self::Key(_) | Self::Config(_) | Self::Io(_) => ErrorKind::ParseFailed,
        }
    }

    pub fn status_code(&self) -> i8 {
        self.kind().status_code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_are_negative_and_unique() {
        let kinds = [
            ErrorKind::UnallocatedHandle,
            ErrorKind::AlreadySet,
            ErrorKind::ParseFailed,
            ErrorKind::InvalidArtifact,
            ErrorKind::InvalidSignature,
            ErrorKind::InvalidAuth,
            ErrorKind::InvalidDigest,
            ErrorKind::BadFence,
            ErrorKind::BadAltitude,
            ErrorKind::InvalidFlightParams,
        ];
        let mut seen = std::collections::HashSet::new();
        for kind in kinds {
            let code = kind.status_code();
            assert!(code < 0, "{kind:?} must map below zero");
            assert!(seen.insert(code), "duplicate code {code}");
        }
        assert!(!seen.contains(&-3));
    }

    #[test]
    fn test_ambient_errors_report_parse_failed() {
        let err = Error::Key("not a public key".into());
        assert_eq!(err.kind(), ErrorKind::ParseFailed);
        assert_eq!(Error::AlreadySet.status_code(), -4);
    }
}
