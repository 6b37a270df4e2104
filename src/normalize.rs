//! HTML normalization.
//!
//! Raw HTML bytes of unknown quality go in; a well-formed XHTML tree comes
//! out. html5ever recovers from malformed markup the way browsers do, so
//! output is produced for anything that is not empty, and every recovery is
//! reported as an advisory diagnostic.

use tracing::warn;

use crate::dom::{ArenaDom, NodeId, XHTML_NS, parse_html};
use crate::error::{Error, Result};
use crate::util::{decode_text, extract_xml_encoding};

/// A normalized document tree plus what the parser had to fix.
#[derive(Debug, Clone)]
pub struct Normalized {
    pub dom: ArenaDom,
    pub diagnostics: Vec<String>,
}

/// Turns raw HTML into XHTML trees titled with the book title.
#[derive(Debug, Clone)]
pub struct Normalizer {
    title: String,
}

impl Normalizer {
    /// `title` replaces whatever `<title>` each source document declares.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    /// Normalize one document.
    ///
    /// `index` is the document's 0-based input position, used in errors and
    /// log fields.
    ///
    /// # Errors
    ///
    /// [`Error::Normalization`] if the input is blank or yields no root element.
    pub fn normalize(&self, index: usize, content: &[u8]) -> Result<Normalized> {
        let hint = extract_xml_encoding(content);
        let html = decode_text(content, hint);

        if html.trim().is_empty() {
            return Err(Error::Normalization {
                index,
                reason: "the document is empty".to_string(),
            });
        }

        let (mut dom, diagnostics) = parse_html(&html);
        for message in &diagnostics {
            warn!(document = index, "{message}");
        }

        let root = dom
            .root_element()
            .filter(|&id| dom.element_name(id).is_some_and(|name| &**name == "html"))
            .ok_or_else(|| Error::Normalization {
                index,
                reason: "the document failed to parse".to_string(),
            })?;

        dom.set_attr(root, "xmlns", XHTML_NS);
        set_title(&mut dom, root, &self.title);

        Ok(Normalized { dom, diagnostics })
    }
}

/// Make the head's single `<title>` read `title`, creating it if needed.
fn set_title(dom: &mut ArenaDom, root: NodeId, title: &str) {
    let head = match child_element(dom, root, "head") {
        Some(head) => head,
        None => {
            let head = dom.create_html_element("head");
            match dom.children(root).next() {
                Some(first) => dom.insert_before(first, head),
                None => dom.append(root, head),
            }
            head
        }
    };

    let titles: Vec<_> = dom
        .children(head)
        .filter(|&id| dom.element_name(id).is_some_and(|name| &**name == "title"))
        .collect();

    let element = match titles.split_first() {
        Some((&first, rest)) => {
            for &extra in rest {
                dom.detach(extra);
            }
            first
        }
        None => {
            let element = dom.create_html_element("title");
            match dom.children(head).next() {
                Some(first) => dom.insert_before(first, element),
                None => dom.append(head, element),
            }
            element
        }
    };

    dom.set_text(element, title);
}

fn child_element(dom: &ArenaDom, parent: NodeId, tag: &str) -> Option<NodeId> {
    dom.children(parent)
        .find(|&id| dom.element_name(id).is_some_and(|name| &**name == tag))
}
