//! EPUB package model.
//!
//! A pure projection from the accumulated book, document and resource
//! records to the three control documents: `META-INF/container.xml`, the OPF
//! package document and the navigation document. No I/O happens here.

mod container;
mod nav;
mod opf;
mod properties;

pub use container::container_xml;
pub use properties::ContentProperties;

use crate::model::{Book, DocumentRecord, ResourceRecord};

/// Literal content of the `mimetype` entry.
pub const MIMETYPE: &str = "application/epub+zip";
pub const MIMETYPE_PATH: &str = "mimetype";
pub const CONTAINER_PATH: &str = "META-INF/container.xml";
/// Directory holding the package document and all content.
pub const PACKAGE_DIR: &str = "EPUB";
pub const OPF_PATH: &str = "EPUB/package.opf";
pub const NAV_PATH: &str = "EPUB/toc.xhtml";
/// Navigation document href relative to the package document.
pub const NAV_HREF: &str = "toc.xhtml";
pub const NAV_ID: &str = "toc";
pub const XHTML_MEDIA_TYPE: &str = "application/xhtml+xml";

/// One `<item>` of the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestItem {
    pub id: String,
    pub href: String,
    pub media_type: String,
    pub properties: Option<String>,
}

/// One `<itemref>` of the spine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpineItem {
    pub idref: String,
    pub linear: bool,
}

/// Read-only view over a conversion's state, projecting it to XML.
#[derive(Debug, Clone, Copy)]
pub struct Package<'a> {
    pub book: &'a Book,
    pub documents: &'a [DocumentRecord],
    pub resources: &'a [ResourceRecord],
    /// Whether the navigation document's spine entry is linear.
    pub nav_linear: bool,
}

impl<'a> Package<'a> {
    pub fn new(
        book: &'a Book,
        documents: &'a [DocumentRecord],
        resources: &'a [ResourceRecord],
    ) -> Self {
        Self {
            book,
            documents,
            resources,
            nav_linear: true,
        }
    }

    pub fn with_nav_linear(mut self, linear: bool) -> Self {
        self.nav_linear = linear;
        self
    }

    /// Manifest entries: navigation document, documents, then resources.
    pub fn manifest(&self) -> Vec<ManifestItem> {
        let mut items = Vec::with_capacity(1 + self.documents.len() + self.resources.len());

        items.push(ManifestItem {
            id: NAV_ID.to_string(),
            href: NAV_HREF.to_string(),
            media_type: XHTML_MEDIA_TYPE.to_string(),
            properties: Some("nav".to_string()),
        });

        for doc in self.documents {
            items.push(ManifestItem {
                id: doc.id.clone(),
                href: doc.target.clone(),
                media_type: XHTML_MEDIA_TYPE.to_string(),
                properties: ContentProperties::detect(&doc.dom).manifest_value(),
            });
        }

        for resource in self.resources {
            items.push(ManifestItem {
                id: resource.id.clone(),
                href: resource.target.clone(),
                media_type: resource.media_type.clone(),
                properties: None,
            });
        }

        items
    }

    /// Spine: the navigation document first, then documents in input order.
    pub fn spine(&self) -> Vec<SpineItem> {
        std::iter::once(SpineItem {
            idref: NAV_ID.to_string(),
            linear: self.nav_linear,
        })
        .chain(self.documents.iter().map(|doc| SpineItem {
            idref: doc.id.clone(),
            linear: true,
        }))
        .collect()
    }

    pub fn container_xml(&self) -> String {
        container_xml(OPF_PATH)
    }

    pub fn package_opf(&self) -> String {
        opf::generate_opf(self)
    }

    pub fn nav_xhtml(&self) -> String {
        nav::generate_nav(self.book, self.documents)
    }
}
