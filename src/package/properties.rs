//! Manifest `properties` detection for content documents.

use crate::dom::ArenaDom;

/// Tags that make a document `scripted` (scripts and form controls).
const SCRIPTED_TAGS: &[&str] = &["script", "form", "input", "select", "textarea", "button"];

/// Rendering features a reading system must support for a document.
///
/// Detection looks at tag names only; namespaces are not validated, so a
/// prefixed `mml:math` counts the same as `math`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentProperties {
    pub scripted: bool,
    pub mathml: bool,
    pub svg: bool,
}

impl ContentProperties {
    pub fn detect(dom: &ArenaDom) -> Self {
        Self {
            scripted: dom.has_element(|tag| SCRIPTED_TAGS.contains(&tag)),
            mathml: dom.has_element(|tag| is_tag(tag, "math")),
            svg: dom.has_element(|tag| is_tag(tag, "svg")),
        }
    }

    /// Property names in manifest order.
    pub fn names(&self) -> Vec<&'static str> {
        [
            (self.scripted, "scripted"),
            (self.mathml, "mathml"),
            (self.svg, "svg"),
        ]
        .into_iter()
        .filter_map(|(present, name)| present.then_some(name))
        .collect()
    }

    /// Space-separated `properties` value, or `None` when there are none.
    pub fn manifest_value(&self) -> Option<String> {
        let names = self.names();
        (!names.is_empty()).then(|| names.join(" "))
    }
}

fn is_tag(tag: &str, local: &str) -> bool {
    tag == local
        || tag
            .rsplit_once(':')
            .is_some_and(|(_, name)| name == local)
}
