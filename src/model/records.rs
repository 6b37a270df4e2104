//! Per-document and per-resource records.

use url::Url;

use crate::dom::{ArenaDom, to_xhtml};

/// One normalized input document.
///
/// The record exclusively owns its tree; after loading, only resource
/// references inside the tree are rewritten.
#[derive(Debug, Clone)]
pub struct DocumentRecord {
    /// Manifest identifier, e.g. `chapter-1`.
    pub id: String,
    pub dom: ArenaDom,
    /// Display title for the navigation document.
    pub title: String,
    /// Package-relative path, `xhtml/<id>.xhtml`.
    pub target: String,
    /// Advisory messages from normalization.
    pub diagnostics: Vec<String>,
}

impl DocumentRecord {
    /// Serialize the tree as XHTML.
    pub fn to_xhtml(&self) -> String {
        to_xhtml(&self.dom)
    }
}

/// What a resource was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// `img[src]`
    Image,
    /// `head > link[rel=stylesheet]`
    Stylesheet,
}

impl ResourceKind {
    /// Package directory holding resources of this kind.
    pub fn directory(self) -> &'static str {
        match self {
            ResourceKind::Image => "images",
            ResourceKind::Stylesheet => "styles",
        }
    }
}

/// One extracted resource reference.
///
/// References are not deduplicated: the same file referenced twice yields
/// two records and two archive entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub id: String,
    pub kind: ResourceKind,
    /// Fully-qualified source location inside the resource root.
    pub source: Url,
    pub media_type: String,
    /// Package-relative path, `images/<id><ext>` or `styles/<id>.css`.
    pub target: String,
}
