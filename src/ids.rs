//! Identifier allocation for manifest entries.
//!
//! Identifiers are handed out by an [`IdAllocator`] owned by one conversion,
//! so the same input always produces the same identifiers.

use crate::model::ResourceKind;

/// Allocates manifest identifiers for documents and resources.
///
/// Implementations must return identifiers that are unique within one
/// conversion and valid XML IDs; [`crate::EpubBuilder`] rejects collisions.
pub trait IdAllocator: Send {
    /// Identifier for the document at 1-based position `chapter`.
    fn document_id(&mut self, chapter: usize) -> String;

    /// Identifier for the `index`-th (0-based) resource of `kind` in `chapter`.
    fn resource_id(&mut self, chapter: usize, kind: ResourceKind, index: usize) -> String;
}

/// The default scheme: `chapter-N`, `image-N-I`, `style-N-I`.
///
/// Chapter numbers encode input order, so spine order can be read back from
/// the identifiers alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChapterIds;

impl IdAllocator for ChapterIds {
    fn document_id(&mut self, chapter: usize) -> String {
        format!("chapter-{chapter}")
    }

    fn resource_id(&mut self, chapter: usize, kind: ResourceKind, index: usize) -> String {
        let prefix = match kind {
            ResourceKind::Image => "image",
            ResourceKind::Stylesheet => "style",
        };
        format!("{prefix}-{chapter}-{index}")
    }
}
