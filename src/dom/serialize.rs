//! XHTML serialization of an [`ArenaDom`].
//!
//! Output is always well-formed XML: void elements self-close, text and
//! attribute values are escaped, attributes whose names are not XML names are
//! dropped, and foreign subtrees (SVG, MathML) declare their namespace.

use std::fmt::Write;

use html5ever::{Namespace, ns};
use quick_xml::escape::escape;

use super::arena::{ArenaDom, NodeData, NodeId};

pub const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";
pub const SVG_NS: &str = "http://www.w3.org/2000/svg";
pub const MATHML_NS: &str = "http://www.w3.org/1998/Math/MathML";
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Serialize a document as an XHTML5 byte-ready string.
pub fn to_xhtml(dom: &ArenaDom) -> String {
    let mut out = String::with_capacity(dom.len() * 16);
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!DOCTYPE html>\n");

    for child in dom.children(dom.document()) {
        match dom.get(child).map(|n| &n.data) {
            Some(NodeData::Element { .. }) => {
                write_node(dom, child, &ns!(html), &mut out);
                out.push('\n');
            }
            Some(NodeData::Comment(text)) => {
                write_comment(text, &mut out);
                out.push('\n');
            }
            _ => {}
        }
    }

    out
}

fn write_node(dom: &ArenaDom, id: NodeId, parent_ns: &Namespace, out: &mut String) {
    let Some(node) = dom.get(id) else {
        return;
    };

    match &node.data {
        NodeData::Element { name, attrs } => {
            let tag: &str = &name.local;
            out.push('<');
            out.push_str(tag);

            let declares = |attr: &str| {
                attrs.iter().any(|a| qualified_attr_name(a.name.prefix.as_deref(), &a.name.local) == attr)
            };

            if name.ns != *parent_ns && !declares("xmlns") && !name.ns.is_empty() {
                let _ = write!(out, " xmlns=\"{}\"", escape(&*name.ns));
            }
            if name.ns == ns!(svg) && !declares("xmlns:xlink") && uses_xlink(dom, id) {
                let _ = write!(out, " xmlns:xlink=\"{XLINK_NS}\"");
            }

            for attr in attrs {
                let attr_name = qualified_attr_name(attr.name.prefix.as_deref(), &attr.name.local);
                if !is_xml_name(&attr_name) {
                    continue;
                }
                let _ = write!(out, " {}=\"{}\"", attr_name, escape(attr.value.as_str()));
            }

            let is_html = name.ns == ns!(html);
            if is_html && VOID_ELEMENTS.contains(&tag) {
                out.push_str("/>");
                return;
            }
            if !is_html && node.first_child.is_none() {
                out.push_str("/>");
                return;
            }

            out.push('>');
            for child in dom.children(id) {
                write_node(dom, child, &name.ns, out);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
        NodeData::Text(text) => out.push_str(&escape(text.as_str())),
        NodeData::Comment(text) => write_comment(text, out),
        NodeData::Document | NodeData::Doctype { .. } => {}
    }
}

fn write_comment(text: &str, out: &mut String) {
    if text.is_empty() {
        return;
    }
    // "--" is not allowed inside XML comments, nor a trailing "-"
    let mut body = text.replace("--", "- -");
    if body.ends_with('-') {
        body.push(' ');
    }
    out.push_str("<!--");
    out.push_str(&body);
    out.push_str("-->");
}

fn qualified_attr_name(prefix: Option<&str>, local: &str) -> String {
    match prefix {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}:{local}"),
        _ => local.to_string(),
    }
}

fn uses_xlink(dom: &ArenaDom, svg: NodeId) -> bool {
    std::iter::once(svg)
        .chain(dom.descendants(svg))
        .any(|id| match dom.get(id).map(|n| &n.data) {
            Some(NodeData::Element { attrs, .. }) => {
                attrs.iter().any(|a| &*a.name.ns == XLINK_NS)
            }
            _ => false,
        })
}

/// Conservative check for an XML attribute name.
fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_')
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'))
        && name.matches(':').count() <= 1
}
