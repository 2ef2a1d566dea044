#![forbid(unsafe_code)]

//! Enveloped XML-Signature verification for permission artifacts.
//!
//! Processing order:
//! 1. Locate the SignedInfo span (end of its start tag up to `<SignatureValue`)
//! 2. Digest the namespaced SignedInfo start tag plus the canonical span
//! 3. Decode <SignatureValue>
//! 4. Check the signature over the SignedInfo digest against the issuer key
//! 5. Locate the permission body (`<UAPermission` up to `<Signature`)
//! 6. Digest the canonical body plus everything after `</Signature>` verbatim
//! 7. Compare with the <DigestValue> inside SignedInfo
//!
//! Authentication (4) happens before any document content is trusted.
//! Spans and values come from the parsed tree, relative to the enveloped
//! `Signature` element, so a tag name recurring elsewhere in the document
//! cannot move a boundary or stand in for a signed value.

use crate::context::VerifyContext;
use crate::encoding::{decode_base64, encode_base64};
use permart_core::{ns, Error};
use permart_crypto::{Sha1Digest, DIGEST_LEN};
use permart_xml::{child_elements, find_descendant, find_element, opaque_text, start_tag_span};
use std::io::Write;
use std::ops::Range;

/// The two digests computed by a successful verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verified {
    /// Digest over canonical SignedInfo; this is what the issuer signed.
    pub signed_info_digest: [u8; DIGEST_LEN],
    /// Digest over the canonical permission body; matches <DigestValue>.
    pub body_digest: [u8; DIGEST_LEN],
}

/// Byte spans of the signed regions in the artifact text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedSpans {
    /// SignedInfo content after its start tag, up to `<SignatureValue`.
    pub signed_info: Range<usize>,
    /// From `<UAPermission` up to `<Signature`.
    pub body: Range<usize>,
    /// From just after `</Signature>` to the end of the document.
    pub tail: Range<usize>,
}

/// Verify a parsed permission artifact.
pub fn verify(ctx: &VerifyContext, doc: &roxmltree::Document<'_>) -> Result<Verified, Error> {
    let text = doc.input_text().as_bytes();
    let nodes = signature_nodes(doc)?;

    // 1. SignedInfo span
    let signed_info = signed_info_span(&nodes)?;
    log::debug!("SignedInfo span {:?}", signed_info);

    // 2. Digest SignedInfo
    let mut hasher = Sha1Digest::new();
    feed_signed_info(&text[signed_info.clone()], &mut hasher)?;
    let signed_info_digest = hasher.finalize();
    if ctx.debug {
        let mut pre = Vec::new();
        feed_signed_info(&text[signed_info], &mut pre)?;
        log::trace!("SignedInfo pre-digest:\n{}", String::from_utf8_lossy(&pre));
    }

    // 3. SignatureValue
    let sig_b64 = opaque_text(nodes.signature_value)
        .ok_or_else(|| Error::InvalidSignature("SignatureValue is empty".into()))?;
    let raw_signature = decode_base64(sig_b64.as_bytes())
        .map_err(|e| Error::InvalidSignature(format!("SignatureValue: {e}")))?;

    // 4. Authenticate
    let valid = ctx.algorithm.verify_digest(
        &ctx.key.to_verifying_key(),
        &signed_info_digest,
        &raw_signature,
    )?;
    if !valid {
        log::warn!(
            "signature check failed against issuer key {}",
            ctx.key.name.as_deref().unwrap_or("<unnamed>")
        );
        return Err(Error::InvalidAuth("signature value verification failed".into()));
    }

    // 5. Permission body spans
    let (body, tail) = body_spans(doc, &nodes)?;
    log::debug!("UAPermission body span {:?}, tail span {:?}", body, tail);

    // 6. Digest body
    let mut hasher = Sha1Digest::new();
    feed_body(&text[body.clone()], &text[tail.clone()], &mut hasher)?;
    let body_digest = hasher.finalize();
    if ctx.debug {
        let mut pre = Vec::new();
        feed_body(&text[body], &text[tail], &mut pre)?;
        log::trace!("UAPermission pre-digest:\n{}", String::from_utf8_lossy(&pre));
    }

    // 7. Compare against the DigestValue the issuer signed
    let computed = encode_base64(&body_digest);
    let expected = find_descendant(nodes.signed_info, ns::node::DIGEST_VALUE)
        .and_then(opaque_text)
        .ok_or_else(|| Error::InvalidDigest("DigestValue missing from SignedInfo".into()))?
        .trim();
    if computed.as_bytes() != expected.as_bytes() {
        log::warn!("digest mismatch: computed {computed}, artifact carries {expected}");
        return Err(Error::InvalidDigest(format!("expected {expected}, computed {computed}")));
    }

    log::debug!("artifact verified, digest {computed}");
    Ok(Verified {
        signed_info_digest,
        body_digest,
    })
}

/// Locate every signed region without verifying anything.
pub fn signed_spans(doc: &roxmltree::Document<'_>) -> Result<SignedSpans, Error> {
    let nodes = signature_nodes(doc)?;
    let signed_info = signed_info_span(&nodes)?;
    let (body, tail) = body_spans(doc, &nodes)?;
    Ok(SignedSpans {
        signed_info,
        body,
        tail,
    })
}

/// The canonical SignedInfo bytes, exactly as they are digested.
pub fn pre_digest_signed_info(doc: &roxmltree::Document<'_>) -> Result<Vec<u8>, Error> {
    let span = signed_info_span(&signature_nodes(doc)?)?;
    let mut out = Vec::new();
    feed_signed_info(&doc.input_text().as_bytes()[span], &mut out)?;
    Ok(out)
}

/// The canonical permission body bytes, exactly as they are digested.
pub fn pre_digest_body(doc: &roxmltree::Document<'_>) -> Result<Vec<u8>, Error> {
    let text = doc.input_text().as_bytes();
    let (body, tail) = body_spans(doc, &signature_nodes(doc)?)?;
    let mut out = Vec::new();
    feed_body(&text[body], &text[tail], &mut out)?;
    Ok(out)
}

/// The enveloped signature, located by tree position.
struct SignatureNodes<'a, 'input> {
    signature: roxmltree::Node<'a, 'input>,
    signed_info: roxmltree::Node<'a, 'input>,
    signature_value: roxmltree::Node<'a, 'input>,
}

/// `SignedInfo` must be the first element of `Signature`; nothing unsigned
/// may precede it. `SignatureValue` is a direct child of `Signature`.
fn signature_nodes<'a, 'input>(
    doc: &'a roxmltree::Document<'input>,
) -> Result<SignatureNodes<'a, 'input>, Error> {
    let signature = find_element(doc, ns::node::SIGNATURE)
        .ok_or_else(|| Error::InvalidArtifact("Signature".into()))?;
    let signed_info = signature
        .children()
        .find(|n| n.is_element())
        .filter(|n| n.tag_name().name() == ns::node::SIGNED_INFO)
        .ok_or_else(|| {
            Error::InvalidArtifact("SignedInfo is not the first element of Signature".into())
        })?;
    let signature_value = child_elements(signature, ns::node::SIGNATURE_VALUE)
        .next()
        .ok_or_else(|| Error::InvalidArtifact("SignatureValue".into()))?;
    Ok(SignatureNodes {
        signature,
        signed_info,
        signature_value,
    })
}

fn signed_info_span(nodes: &SignatureNodes<'_, '_>) -> Result<Range<usize>, Error> {
    let start = start_tag_span(nodes.signed_info)
        .ok_or_else(|| Error::InvalidArtifact("unterminated SignedInfo start tag".into()))?
        .end;
    let end = nodes.signature_value.range().start;
    if end < nodes.signed_info.range().end {
        return Err(Error::InvalidArtifact("SignatureValue precedes SignedInfo".into()));
    }
    Ok(start..end)
}

fn body_spans(
    doc: &roxmltree::Document<'_>,
    nodes: &SignatureNodes<'_, '_>,
) -> Result<(Range<usize>, Range<usize>), Error> {
    let permission = find_element(doc, ns::node::UA_PERMISSION)
        .ok_or_else(|| Error::InvalidArtifact("UAPermission".into()))?;
    let start = permission.range().start;
    let sig_range = nodes.signature.range();
    if sig_range.start <= start {
        return Err(Error::InvalidArtifact("Signature precedes UAPermission".into()));
    }
    Ok((start..sig_range.start, sig_range.end..doc.input_text().len()))
}

fn feed_signed_info<W: Write + ?Sized>(span: &[u8], out: &mut W) -> Result<(), Error> {
    out.write_all(ns::SIGNED_INFO_C14N_START.as_bytes())?;
    permart_c14n::canonicalize(span, out)?;
    Ok(())
}

fn feed_body<W: Write + ?Sized>(body: &[u8], tail: &[u8], out: &mut W) -> Result<(), Error> {
    permart_c14n::canonicalize(body, out)?;
    out.write_all(tail)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use permart_crypto::{SignatureAlgorithm, VerifyingKey};
    use std::sync::{Arc, Mutex};

    const ISSUER_PUB: &str = include_str!("../../../testdata/keys/issuer_pub.pem");

    /// Accepts or rejects every signature, and records the digest it saw.
    #[derive(Clone)]
    struct FixedOutcome {
        accept: bool,
        seen: Arc<Mutex<Vec<Vec<u8>>>>,
    }

    impl FixedOutcome {
        fn new(accept: bool) -> Self {
            Self {
                accept,
                seen: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl SignatureAlgorithm for FixedOutcome {
        fn uri(&self) -> &'static str {
            "urn:test:fixed"
        }

        fn verify_digest(
            &self,
            _key: &VerifyingKey,
            digest: &[u8],
            _sig: &[u8],
        ) -> Result<bool, Error> {
            self.seen.lock().unwrap().push(digest.to_vec());
            Ok(self.accept)
        }
    }

    fn ctx(outcome: &FixedOutcome) -> VerifyContext {
        let key =
            permart_keys::loader::load_rsa_public_pem(ISSUER_PUB.as_bytes()).unwrap();
        VerifyContext::new(key).with_algorithm(Box::new(outcome.clone()))
    }

    const SIGNED_INFO: &str = concat!(
        "<SignedInfo><CanonicalizationMethod Algorithm=\"http://www.w3.org/TR/2001/REC-xml-c14n-20010315\"/>",
        "<SignatureMethod Algorithm=\"http://www.w3.org/2000/09/xmldsig#rsa-sha1\"/>",
        "<Reference URI=\"\"><DigestMethod Algorithm=\"http://www.w3.org/2000/09/xmldsig#sha1\"/>",
        "<DigestValue>DIGEST</DigestValue></Reference></SignedInfo>"
    );

    const SIGNED_INFO_CANONICAL: &str = concat!(
        "<SignedInfo xmlns=\"http://www.w3.org/2000/09/xmldsig#\">",
        "<CanonicalizationMethod Algorithm=\"http://www.w3.org/TR/2001/REC-xml-c14n-20010315\"></CanonicalizationMethod>",
        "<SignatureMethod Algorithm=\"http://www.w3.org/2000/09/xmldsig#rsa-sha1\"></SignatureMethod>",
        "<Reference URI=\"\"><DigestMethod Algorithm=\"http://www.w3.org/2000/09/xmldsig#sha1\"></DigestMethod>",
        "<DigestValue>DIGEST</DigestValue></Reference></SignedInfo>"
    );

    const BODY: &str = concat!(
        "<UAPermission><Permission><FlightDetails><FlightParameters adcNumber=\"A1\"/>",
        "</FlightDetails></Permission>"
    );

    fn body_digest_b64() -> String {
        let canonical = concat!(
            "<UAPermission><Permission><FlightDetails><FlightParameters adcNumber=\"A1\"></FlightParameters>",
            "</FlightDetails></Permission>",
            "</UAPermission>\n"
        );
        let digest = permart_crypto::digest::digest(canonical.as_bytes());
        encode_base64(&digest)
    }

    fn artifact(digest_b64: &str) -> String {
        format!(
            "<?xml version=\"1.0\"?>\n{BODY}<Signature xmlns=\"http://www.w3.org/2000/09/xmldsig#\">{}<SignatureValue>AAAA</SignatureValue></Signature></UAPermission>\n",
            SIGNED_INFO.replace("DIGEST", digest_b64)
        )
    }

    #[test]
    fn test_accepts_matching_digest() {
        let outcome = FixedOutcome::new(true);
        let xml = artifact(&body_digest_b64());
        let doc = roxmltree::Document::parse(&xml).unwrap();
        let verified = verify(&ctx(&outcome), &doc).unwrap();

        let expected = SIGNED_INFO_CANONICAL.replace("DIGEST", &body_digest_b64());
        assert_eq!(pre_digest_signed_info(&doc).unwrap(), expected.as_bytes());

        let seen = outcome.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0], permart_crypto::digest::digest(expected.as_bytes()));
        assert_eq!(verified.signed_info_digest.as_slice(), seen[0].as_slice());
    }

    #[test]
    fn test_rejected_signature_is_invalid_auth() {
        let outcome = FixedOutcome::new(false);
        let xml = artifact(&body_digest_b64());
        let doc = roxmltree::Document::parse(&xml).unwrap();
        let err = verify(&ctx(&outcome), &doc).unwrap_err();
        assert!(matches!(err, Error::InvalidAuth(_)));
    }

    #[test]
    fn test_wrong_digest_is_invalid_digest() {
        let outcome = FixedOutcome::new(true);
        let xml = artifact("AAAAAAAAAAAAAAAAAAAAAAAAAAA=");
        let doc = roxmltree::Document::parse(&xml).unwrap();
        let err = verify(&ctx(&outcome), &doc).unwrap_err();
        assert!(matches!(err, Error::InvalidDigest(_)));
    }

    #[test]
    fn test_missing_markers_are_invalid_artifact() {
        let outcome = FixedOutcome::new(true);
        let no_signed_info = "<UAPermission><Signature><SignatureValue>AAAA</SignatureValue></Signature></UAPermission>";
        let doc = roxmltree::Document::parse(no_signed_info).unwrap();
        assert!(matches!(
            verify(&ctx(&outcome), &doc),
            Err(Error::InvalidArtifact(_))
        ));

        let no_sig_value = "<UAPermission><Signature><SignedInfo></SignedInfo></Signature></UAPermission>";
        let doc = roxmltree::Document::parse(no_sig_value).unwrap();
        assert!(matches!(
            verify(&ctx(&outcome), &doc),
            Err(Error::InvalidArtifact(_))
        ));

        let no_permission = "<Other><Signature><SignedInfo></SignedInfo><SignatureValue>AAAA</SignatureValue></Signature></Other>";
        let doc = roxmltree::Document::parse(no_permission).unwrap();
        assert!(matches!(
            verify(&ctx(&outcome), &doc),
            Err(Error::InvalidArtifact(_))
        ));
    }

    #[test]
    fn test_out_of_order_markers() {
        let outcome = FixedOutcome::new(true);
        let xml = "<UAPermission><SignatureValue>AAAA</SignatureValue><Signature><SignedInfo></SignedInfo></Signature></UAPermission>";
        let doc = roxmltree::Document::parse(xml).unwrap();
        assert!(matches!(
            verify(&ctx(&outcome), &doc),
            Err(Error::InvalidArtifact(_))
        ));
    }

    #[test]
    fn test_empty_signature_value_is_invalid_signature() {
        let outcome = FixedOutcome::new(true);
        let xml = "<UAPermission><Signature><SignedInfo></SignedInfo><SignatureValue></SignatureValue></Signature></UAPermission>";
        let doc = roxmltree::Document::parse(xml).unwrap();
        assert!(matches!(
            verify(&ctx(&outcome), &doc),
            Err(Error::InvalidSignature(_))
        ));
        assert!(outcome.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_spans_ignore_markup_inside_cdata() {
        let xml = artifact(&body_digest_b64()).replace(
            "<FlightDetails>",
            "<FlightDetails><Note><![CDATA[<Signature>]]></Note>",
        );
        let doc = roxmltree::Document::parse(&xml).unwrap();
        let spans = signed_spans(&doc).unwrap();
        let text = doc.input_text();
        assert!(text[spans.body.clone()].starts_with("<UAPermission>"));
        assert!(text[spans.body.clone()].contains("<![CDATA[<Signature>]]>"));
        assert!(text[spans.body.end..].starts_with("<Signature xmlns="));
        assert_eq!(&text[spans.tail], "</UAPermission>\n");
        assert!(text[spans.signed_info].ends_with("</SignedInfo>"));
    }

    #[test]
    fn test_digest_value_outside_signed_info_is_ignored() {
        // A forged body with its own digest placed after SignatureValue: only
        // the DigestValue inside SignedInfo counts.
        let outcome = FixedOutcome::new(true);
        let forged_body = BODY.replace("A1", "A2");
        let forged_digest = encode_base64(&permart_crypto::digest::digest(
            format!(
                "{}</UAPermission>\n",
                forged_body.replace("\"/>", "\"></FlightParameters>")
            )
            .as_bytes(),
        ));
        let xml = artifact(&body_digest_b64())
            .replace(BODY, &forged_body)
            .replace(
                "</SignatureValue>",
                &format!("</SignatureValue><DigestValue>{forged_digest}</DigestValue>"),
            );
        let doc = roxmltree::Document::parse(&xml).unwrap();
        assert!(matches!(
            verify(&ctx(&outcome), &doc),
            Err(Error::InvalidDigest(_))
        ));
    }

    #[test]
    fn test_markup_before_signed_info_is_invalid_artifact() {
        let outcome = FixedOutcome::new(true);
        for inserted in [
            "<DigestValue>AAAA</DigestValue>",
            "<SignatureValue>AAAA</SignatureValue>",
        ] {
            let xml = artifact(&body_digest_b64()).replace(
                "<SignedInfo>",
                &format!("{inserted}<SignedInfo>"),
            );
            let doc = roxmltree::Document::parse(&xml).unwrap();
            assert!(
                matches!(verify(&ctx(&outcome), &doc), Err(Error::InvalidArtifact(_))),
                "{inserted}"
            );
        }
        assert!(outcome.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_signature_before_permission_is_invalid_artifact() {
        let outcome = FixedOutcome::new(true);
        let xml = format!(
            "<Root><Signature>{}<SignatureValue>AAAA</SignatureValue></Signature>{BODY}</UAPermission></Root>",
            SIGNED_INFO.replace("DIGEST", &body_digest_b64())
        );
        let doc = roxmltree::Document::parse(&xml).unwrap();
        assert!(matches!(
            verify(&ctx(&outcome), &doc),
            Err(Error::InvalidArtifact(_))
        ));
    }
}
