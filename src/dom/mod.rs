//! Owned, mutable document trees.
//!
//! HTML is parsed with html5ever into an arena-allocated tree that supports
//! the handful of queries the packaging pipeline needs (find by tag, read and
//! rewrite attributes, collect text) and serializes back out as XHTML.

mod arena;
mod serialize;
mod tree_sink;

pub use arena::{ArenaDom, Attribute, ChildrenIter, Descendants, Node, NodeData, NodeId};
pub use serialize::{MATHML_NS, SVG_NS, XHTML_NS, XLINK_NS, to_xhtml};

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;

use tree_sink::ArenaSink;

/// Parse an HTML string into an [`ArenaDom`].
///
/// Parsing never fails: malformed markup is recovered the way browsers
/// recover it, and each recovery is reported in the returned diagnostics.
pub fn parse_html(html: &str) -> (ArenaDom, Vec<String>) {
    parse_document(ArenaSink::new(), ParseOpts::default())
        .from_utf8()
        .one(html.as_bytes())
        .into_parts()
}
