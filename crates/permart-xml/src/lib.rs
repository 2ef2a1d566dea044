#![forbid(unsafe_code)]

//! XML document abstraction for the permission artifact verifier.
//!
//! Provides an owned document over `roxmltree`, name lookups, and the source
//! spans the verifier needs to digest exact byte ranges.

pub mod document;

pub use document::{
    child_elements, find_descendant, find_element, opaque_text, start_tag_span, XmlDocument,
};

/// Upper bound on parsed nodes. Permission artifacts are a few hundred nodes;
/// anything far beyond that is not an artifact.
pub const MAX_NODES: u32 = 1 << 16;

/// Return roxmltree parsing options for permission artifacts.
///
/// DTDs are refused: the schema never uses them and the signed region must
/// not depend on entity expansion.
pub fn parsing_options() -> roxmltree::ParsingOptions {
    roxmltree::ParsingOptions {
        allow_dtd: false,
        nodes_limit: MAX_NODES,
        ..roxmltree::ParsingOptions::default()
    }
}
