//! Resource extraction and relocation.
//!
//! Images (`img[src]`) and stylesheets (`head > link[rel=stylesheet]`) are
//! resolved against a trusted [`ResourceRoot`], checked to lie inside it,
//! given a package path and rewritten in place to point at that path.

use std::path::Path;

use tracing::{debug, warn};
use url::Url;

use crate::dom::{ArenaDom, NodeId};
use crate::error::{Error, Result};
use crate::ids::IdAllocator;
use crate::model::{ResourceKind, ResourceRecord};

const STYLESHEET_MEDIA_TYPE: &str = "text/css";
const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// The base location every resource reference must resolve beneath.
///
/// Always ends with `/`, so a root of `/a/b` never admits `/a/bc/...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRoot {
    base: Url,
}

impl ResourceRoot {
    /// Parse a root from a URL (`file:///books/data/`, `https://host/data`)
    /// or, failing that, a filesystem directory path.
    pub fn parse(root: &str) -> Result<Self> {
        match Url::parse(root) {
            // Single-letter schemes are Windows drive letters, not URLs
            Ok(url) if url.scheme().len() > 1 => Self::from_url(url),
            _ => Self::from_dir(root),
        }
    }

    /// Use a directory on the local filesystem as the root.
    pub fn from_dir(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let absolute = std::path::absolute(path)
            .map_err(|e| Error::InvalidResourceRoot(format!("{}: {e}", path.display())))?;
        let base = Url::from_directory_path(&absolute).map_err(|()| {
            Error::InvalidResourceRoot(format!("{} is not a directory path", absolute.display()))
        })?;
        Ok(Self { base })
    }

    fn from_url(mut base: Url) -> Result<Self> {
        if base.cannot_be_a_base() {
            return Err(Error::InvalidResourceRoot(format!(
                "{base} cannot be used as a base URL"
            )));
        }
        base.set_query(None);
        base.set_fragment(None);
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { base })
    }

    pub fn url(&self) -> &Url {
        &self.base
    }

    pub fn as_str(&self) -> &str {
        self.base.as_str()
    }

    /// Resolve a reference as root-relative: leading separators are
    /// stripped, so `/images/a.png` is `<root>images/a.png`.
    pub fn resolve(&self, reference: &str) -> std::result::Result<Url, url::ParseError> {
        let relative = reference.trim_start_matches(['/', '\\']);
        self.base.join(relative)
    }

    /// String-prefix containment against the slash-terminated root.
    ///
    /// The remainder of the path must not hold a percent-encoded `/` or `\`:
    /// loaders decode segments, so `..%2f` would climb out of the root.
    pub fn contains(&self, location: &Url) -> bool {
        location
            .as_str()
            .strip_prefix(self.base.as_str())
            .is_some_and(|rest| {
                let path = rest.split(['?', '#']).next().unwrap_or_default();
                !has_encoded_separator(path)
            })
    }
}

fn has_encoded_separator(path: &str) -> bool {
    let path = path.to_ascii_lowercase();
    path.contains("%2f") || path.contains("%5c")
}

/// Extracts resources from one document tree.
pub struct ResourceResolver<'a> {
    root: &'a ResourceRoot,
}

impl<'a> ResourceResolver<'a> {
    pub fn new(root: &'a ResourceRoot) -> Self {
        Self { root }
    }

    /// Find, resolve, record and rewrite every resource reference in `dom`.
    ///
    /// References are processed in document order. The first reference that
    /// resolves outside the root fails the whole call with
    /// [`Error::SecurityViolation`].
    pub fn extract(
        &self,
        dom: &mut ArenaDom,
        document_id: &str,
        chapter: usize,
        ids: &mut dyn IdAllocator,
    ) -> Result<Vec<ResourceRecord>> {
        let mut records = Vec::new();
        let mut image_index = 0;
        let mut style_index = 0;

        for (node, kind, attr) in find_references(dom) {
            let Some(reference) = dom.get_attr(node, attr).map(str::trim) else {
                continue;
            };
            if reference.is_empty() || has_scheme(reference, "data") {
                warn!(
                    document = document_id,
                    reference,
                    "leaving empty or data: reference in place"
                );
                continue;
            }
            let reference = reference.to_string();

            let source = self
                .root
                .resolve(&reference)
                .map_err(|e| Error::InvalidReference {
                    document: document_id.to_string(),
                    reference: reference.clone(),
                    reason: e.to_string(),
                })?;

            if !self.root.contains(&source) {
                return Err(Error::SecurityViolation {
                    document: document_id.to_string(),
                    reference,
                    resolved: source.to_string(),
                });
            }

            let index = match kind {
                ResourceKind::Image => &mut image_index,
                ResourceKind::Stylesheet => &mut style_index,
            };
            let id = ids.resource_id(chapter, kind, *index);
            *index += 1;

            let (target, media_type) = match kind {
                ResourceKind::Image => {
                    let name = file_name(&source);
                    let target = match extension(name) {
                        Some(ext) => format!("{}/{id}.{ext}", kind.directory()),
                        None => format!("{}/{id}", kind.directory()),
                    };
                    let media_type = mime_guess::from_path(name)
                        .first_raw()
                        .unwrap_or(FALLBACK_MEDIA_TYPE);
                    (target, media_type.to_string())
                }
                ResourceKind::Stylesheet => (
                    format!("{}/{id}.css", kind.directory()),
                    STYLESHEET_MEDIA_TYPE.to_string(),
                ),
            };

            debug!(document = document_id, %source, %target, "extracted resource");
            dom.set_attr(node, attr, &format!("../{target}"));

            records.push(ResourceRecord {
                id,
                kind,
                source,
                media_type,
                target,
            });
        }

        Ok(records)
    }
}

/// Every `img[src]` and `head > link[rel~=stylesheet][href]`, in document order.
fn find_references(dom: &ArenaDom) -> Vec<(NodeId, ResourceKind, &'static str)> {
    dom.descendants(dom.document())
        .filter_map(|id| {
            let node = dom.get(id)?;
            match node.tag()? {
                "img" if dom.get_attr(id, "src").is_some() => Some((id, ResourceKind::Image, "src")),
                "link" if is_stylesheet_link(dom, id) => {
                    Some((id, ResourceKind::Stylesheet, "href"))
                }
                _ => None,
            }
        })
        .collect()
}

fn is_stylesheet_link(dom: &ArenaDom, id: NodeId) -> bool {
    let in_head = dom
        .get(id)
        .and_then(|n| dom.element_name(n.parent))
        .is_some_and(|parent| &**parent == "head");

    in_head
        && dom.get_attr(id, "href").is_some()
        && dom.get_attr(id, "rel").is_some_and(|rel| {
            rel.split_ascii_whitespace()
                .any(|token| token.eq_ignore_ascii_case("stylesheet"))
        })
}

fn has_scheme(reference: &str, scheme: &str) -> bool {
    reference
        .split_once(':')
        .is_some_and(|(prefix, _)| prefix.trim().eq_ignore_ascii_case(scheme))
}

/// Final path segment of a URL, ignoring query and fragment.
fn file_name(url: &Url) -> &str {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or("")
}

/// Extension of a file name, if it is plain alphanumeric.
fn extension(name: &str) -> Option<&str> {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
}
