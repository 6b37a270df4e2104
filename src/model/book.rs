//! Book metadata and input items.

use chrono::{DateTime, SecondsFormat, Utc};

/// Language used when the caller does not name one.
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Caller-supplied book metadata.
///
/// Immutable for the lifetime of one conversion.
///
/// # Example
///
/// ```
/// use html_epub::{Book, Contributor};
///
/// let book = Book::new("urn:uuid:5b3c2f0e-8d3a-4e39-9f61-2d0c1f6b8e7a", "My Book")
///     .with_language("fr")
///     .with_contributor(Contributor::new("Jane Doe").with_role("edt"));
///
/// assert_eq!(book.language, "fr");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    /// Unique package identifier, ideally a URI or UUID.
    pub identifier: String,
    pub title: String,
    /// BCP 47 language tag (default `en-US`).
    pub language: String,
    /// Last-modified timestamp (default: construction time).
    pub updated: DateTime<Utc>,
    pub license_url: Option<String>,
    pub contributors: Vec<Contributor>,
}

impl Book {
    pub fn new(identifier: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            title: title.into(),
            language: DEFAULT_LANGUAGE.to_string(),
            updated: Utc::now(),
            license_url: None,
            contributors: Vec::new(),
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_updated(mut self, updated: DateTime<Utc>) -> Self {
        self.updated = updated;
        self
    }

    pub fn with_license_url(mut self, url: impl Into<String>) -> Self {
        self.license_url = Some(url.into());
        self
    }

    pub fn with_contributor(mut self, contributor: Contributor) -> Self {
        self.contributors.push(contributor);
        self
    }

    /// The `dcterms:modified` value: UTC, whole seconds, `Z` suffix.
    pub fn modified(&self) -> String {
        self.updated.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

/// A contributor listed in the package metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contributor {
    /// Display name.
    pub name: String,
    /// Optional MARC relator code (e.g. `edt`, `trl`).
    pub role: Option<String>,
}

impl Contributor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: None,
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }
}

/// One input HTML document. Order of items is reading order.
#[derive(Debug, Clone, Default)]
pub struct HtmlItem {
    /// Raw HTML bytes, in any encoding `encoding_rs` can sniff.
    pub content: Vec<u8>,
    /// Explicit display title; otherwise the first `h1` is used.
    pub title: Option<String>,
}

impl HtmlItem {
    pub fn new(content: impl Into<Vec<u8>>) -> Self {
        Self {
            content: content.into(),
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}
