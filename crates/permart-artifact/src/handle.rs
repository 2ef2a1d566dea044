#![forbid(unsafe_code)]

//! The artifact handle: one-shot ingestion, verification and extraction.

use crate::fence::{extract_fence, Fence};
use crate::params::{extract_params, FlightParams};
use permart_core::{Error, ErrorKind};
use permart_dsig::{decode_base64, verify, VerifyContext, Verified};
use permart_xml::XmlDocument;

/// Where a handle is in its ingestion pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Empty,
    RawSet,
    Parsed,
    Verified,
    FenceExtracted,
    ParamsExtracted,
    Failed(ErrorKind),
}

/// One permission artifact under evaluation.
///
/// The artifact is immutable once ingested: a second [`Handle::set`] fails
/// with [`Error::AlreadySet`] until [`Handle::reset`] is called. Extracted
/// data is only exposed after every stage succeeded.
#[derive(Debug)]
pub struct Handle {
    ctx: VerifyContext,
    raw: Option<Vec<u8>>,
    document: Option<XmlDocument>,
    verified: Option<Verified>,
    fence: Option<Fence>,
    flight_params: Option<FlightParams>,
    state: Lifecycle,
}

impl Handle {
    /// Create an empty handle that verifies against the issuer key in `ctx`.
    pub fn new(ctx: VerifyContext) -> Self {
        Self {
            ctx,
            raw: None,
            document: None,
            verified: None,
            fence: None,
            flight_params: None,
            state: Lifecycle::Empty,
        }
    }

    /// Ingest an artifact, then verify it and extract the fence and flight
    /// parameters. The first failing stage is returned.
    pub fn set(&mut self, data: &[u8], is_base64: bool) -> Result<(), Error> {
        if self.raw.is_some() {
            log::warn!("artifact already set on this handle");
            return Err(Error::AlreadySet);
        }
        match self.ingest(data, is_base64) {
            Ok(()) => {
                log::info!("permission artifact accepted");
                Ok(())
            }
            Err(e) => {
                log::warn!("permission artifact rejected: {e}");
                self.verified = None;
                self.fence = None;
                self.flight_params = None;
                self.state = Lifecycle::Failed(e.kind());
                Err(e)
            }
        }
    }

    fn ingest(&mut self, data: &[u8], is_base64: bool) -> Result<(), Error> {
        let raw = if is_base64 {
            decode_base64(data).map_err(|e| Error::ParseFailed(format!("base64: {e}")))?
        } else {
            data.to_vec()
        };
        let raw = self.raw.insert(raw);
        self.state = Lifecycle::RawSet;
        log::debug!("artifact is {} bytes", raw.len());

        let document = self.document.insert(XmlDocument::parse_bytes(raw)?);
        let doc = document.parse_doc()?;
        self.state = Lifecycle::Parsed;

        self.verified = Some(verify(&self.ctx, &doc)?);
        self.state = Lifecycle::Verified;

        self.fence = Some(extract_fence(&doc)?);
        self.state = Lifecycle::FenceExtracted;

        self.flight_params = Some(extract_params(&doc)?);
        self.state = Lifecycle::ParamsExtracted;
        Ok(())
    }

    /// Drop the ingested artifact and everything derived from it.
    pub fn reset(&mut self) {
        self.raw = None;
        self.document = None;
        self.verified = None;
        self.fence = None;
        self.flight_params = None;
        self.state = Lifecycle::Empty;
    }

    pub fn state(&self) -> Lifecycle {
        self.state
    }

    pub fn is_trusted(&self) -> bool {
        self.state == Lifecycle::ParamsExtracted
    }

    /// The decoded artifact bytes, once set.
    pub fn raw_bytes(&self) -> Option<&[u8]> {
        self.raw.as_deref()
    }

    /// The parsed artifact, once parsing succeeded.
    pub fn document(&self) -> Option<&XmlDocument> {
        self.document.as_ref()
    }

    pub fn verification(&self) -> Option<&Verified> {
        self.trusted().and(self.verified.as_ref())
    }

    pub fn fence(&self) -> Option<&Fence> {
        self.trusted().and(self.fence.as_ref())
    }

    pub fn flight_params(&self) -> Option<&FlightParams> {
        self.trusted().and(self.flight_params.as_ref())
    }

    fn trusted(&self) -> Option<()> {
        self.is_trusted().then_some(())
    }
}
