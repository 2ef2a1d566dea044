#![forbid(unsafe_code)]

//! XML document wrapper over roxmltree with source-span helpers.

use permart_core::Error;
use std::ops::Range;

/// An owned XML document.  Stores the decoded artifact text.
///
/// To work with the parsed tree, call [`XmlDocument::parse_doc`] which
/// returns a temporary `roxmltree::Document` borrowing from the text.
#[derive(Debug, Clone)]
pub struct XmlDocument {
    text: String,
}

impl XmlDocument {
    /// Parse and validate XML from a string, taking ownership.
    pub fn parse(text: String) -> Result<Self, Error> {
        // Validate that the XML parses successfully.
        let _doc = roxmltree::Document::parse_with_options(&text, crate::parsing_options())
            .map_err(|e| Error::ParseFailed(e.to_string()))?;
        Ok(Self { text })
    }

    /// Parse and validate XML from bytes.
    pub fn parse_bytes(data: &[u8]) -> Result<Self, Error> {
        let text = std::str::from_utf8(data)
            .map_err(|e| Error::ParseFailed(format!("invalid UTF-8: {e}")))?
            .to_owned();
        Self::parse(text)
    }

    /// Get the raw XML text.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    /// Parse the document and return a temporary `roxmltree::Document`.
    ///
    /// This re-parses the XML from the stored text.  Call it once at the top
    /// of a processing pipeline and pass the resulting document down.
    pub fn parse_doc(&self) -> Result<roxmltree::Document<'_>, Error> {
        roxmltree::Document::parse_with_options(&self.text, crate::parsing_options())
            .map_err(|e| Error::ParseFailed(e.to_string()))
    }
}

/// Find the first element with the given local name, depth-first over the
/// whole tree.
pub fn find_element<'a, 'input>(
    doc: &'a roxmltree::Document<'input>,
    local_name: &str,
) -> Option<roxmltree::Node<'a, 'input>> {
    doc.descendants()
        .find(|n| n.is_element() && n.tag_name().name() == local_name)
}

/// Find the first element with the given local name below `parent`.
pub fn find_descendant<'a, 'input>(
    parent: roxmltree::Node<'a, 'input>,
    local_name: &str,
) -> Option<roxmltree::Node<'a, 'input>> {
    parent
        .descendants()
        .skip(1)
        .find(|n| n.is_element() && n.tag_name().name() == local_name)
}

/// Element children of `parent` with the given local name, in document order.
/// Text, comment and differently named children are skipped.
pub fn child_elements<'a, 'input>(
    parent: roxmltree::Node<'a, 'input>,
    local_name: &'a str,
) -> impl Iterator<Item = roxmltree::Node<'a, 'input>> + 'a {
    parent
        .children()
        .filter(move |n| n.is_element() && n.tag_name().name() == local_name)
}

/// The text content of an element, as written between its tags.
pub fn opaque_text<'a>(node: roxmltree::Node<'a, '_>) -> Option<&'a str> {
    node.text()
}

/// Byte span of an element's start tag, `<Name ...>` inclusive.
///
/// `None` when the node is not an element or the tag is unterminated. For a
/// self-closing element the span covers the whole `<Name .../>`.
pub fn start_tag_span(node: roxmltree::Node<'_, '_>) -> Option<Range<usize>> {
    if !node.is_element() {
        return None;
    }
    let range = node.range();
    let text = node.document().input_text().as_bytes();
    let end = range.end.min(text.len());

    let mut quote: Option<u8> = None;
    for (offset, &b) in text[range.start..end].iter().enumerate() {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None if b == b'>' => return Some(range.start..range.start + offset + 1),
            None => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = concat!(
        "<UAPermission><Owner name=\"a>b\"/>",
        "<Coordinates><Coordinate latitude=\"1\"/>text<Other/><Coordinate latitude=\"2\"/></Coordinates>",
        "</UAPermission>"
    );

    #[test]
    fn test_parse_bytes_rejects_invalid_utf8() {
        let err = XmlDocument::parse_bytes(&[b'<', 0xff, b'>']).unwrap_err();
        assert!(matches!(err, Error::ParseFailed(_)));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(XmlDocument::parse("<a><b></a>".into()).is_err());
        assert!(XmlDocument::parse(String::new()).is_err());
    }

    #[test]
    fn test_child_elements_in_order() {
        let xml = XmlDocument::parse(SAMPLE.into()).unwrap();
        let doc = xml.parse_doc().unwrap();
        let coords = find_element(&doc, "Coordinates").unwrap();
        let lats: Vec<&str> = child_elements(coords, "Coordinate")
            .map(|n| n.attribute("latitude").unwrap())
            .collect();
        assert_eq!(lats, ["1", "2"]);
    }

    #[test]
    fn test_start_tag_span_skips_quoted_gt() {
        let xml = XmlDocument::parse(SAMPLE.into()).unwrap();
        let doc = xml.parse_doc().unwrap();

        let root = find_element(&doc, "UAPermission").unwrap();
        let span = start_tag_span(root).unwrap();
        assert_eq!(&SAMPLE[span], "<UAPermission>");

        let owner = find_element(&doc, "Owner").unwrap();
        let span = start_tag_span(owner).unwrap();
        assert_eq!(&SAMPLE[span], "<Owner name=\"a>b\"/>");
    }

    #[test]
    fn test_find_descendant_excludes_self() {
        let xml = XmlDocument::parse("<A><B><A/></B></A>".into()).unwrap();
        let doc = xml.parse_doc().unwrap();
        let outer = find_element(&doc, "A").unwrap();
        let inner = find_descendant(outer, "A").unwrap();
        assert_ne!(outer.range(), inner.range());
        assert_eq!(inner.range().start, 6);
    }
}
