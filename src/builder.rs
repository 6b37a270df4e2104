//! The per-conversion accumulator.
//!
//! An [`EpubBuilder`] owns one book's metadata, its resource root and the
//! document and resource records loaded so far. Loading is all-or-nothing per
//! call; writing projects the accumulated state to an archive.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufWriter, Seek, Write};
use std::path::Path;

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::dom::ArenaDom;
use crate::error::{Error, Result};
use crate::export::{EpubConfig, EpubWriter};
use crate::ids::{ChapterIds, IdAllocator};
use crate::io::{FileLoader, ResourceLoader};
use crate::model::{Book, DocumentRecord, HtmlItem, ResourceKind, ResourceRecord};
use crate::normalize::{Normalized, Normalizer};
use crate::package::{NAV_ID, Package};
use crate::resources::{ResourceResolver, ResourceRoot};
use crate::util::collapse_whitespace;

/// Builds one EPUB from a sequence of HTML documents.
///
/// # Example
///
/// ```
/// use html_epub::{Book, EpubBuilder, HtmlItem, MemoryLoader, ResourceRoot};
/// use std::io::Cursor;
///
/// let root = ResourceRoot::parse("file:///books/data/")?;
/// let png = root.resolve("images/1.png").unwrap();
/// let loader = MemoryLoader::new().with(&png, b"\x89PNG".to_vec());
///
/// let mut builder = EpubBuilder::new(Book::new("urn:isbn:123", "Test Book"), root)
///     .with_loader(loader);
/// builder.load(vec![
///     HtmlItem::new(b"<h1>Chapter 1</h1><img src=\"images/1.png\">".to_vec()),
///     HtmlItem::new(b"<h1>Chapter 2</h1>".to_vec()).with_title("Second"),
/// ])?;
///
/// assert_eq!(builder.documents()[0].title, "Chapter 1");
/// assert_eq!(builder.resources()[0].target, "images/image-1-0.png");
///
/// let mut out = Cursor::new(Vec::new());
/// builder.write(&mut out)?;
/// # Ok::<(), html_epub::Error>(())
/// ```
pub struct EpubBuilder {
    book: Book,
    root: ResourceRoot,
    config: EpubConfig,
    ids: Box<dyn IdAllocator>,
    loader: Box<dyn ResourceLoader>,
    documents: Vec<DocumentRecord>,
    resources: Vec<ResourceRecord>,
}

impl EpubBuilder {
    /// Create a builder reading resources from the local filesystem.
    pub fn new(book: Book, root: ResourceRoot) -> Self {
        Self {
            book,
            root,
            config: EpubConfig::default(),
            ids: Box::new(ChapterIds),
            loader: Box::new(FileLoader),
            documents: Vec::new(),
            resources: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: EpubConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the identifier scheme.
    pub fn with_id_allocator(mut self, ids: impl IdAllocator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    /// Replace where resource bytes are read from when writing.
    pub fn with_loader(mut self, loader: impl ResourceLoader + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }

    pub fn book(&self) -> &Book {
        &self.book
    }

    pub fn root(&self) -> &ResourceRoot {
        &self.root
    }

    pub fn config(&self) -> &EpubConfig {
        &self.config
    }

    /// Normalize one document without recording it.
    ///
    /// The returned tree is in the XHTML namespace and titled with the book
    /// title.
    pub fn parse(&self, content: &[u8]) -> Result<ArenaDom> {
        Normalizer::new(self.book.title.as_str())
            .normalize(0, content)
            .map(|normalized| normalized.dom)
    }

    /// Normalize, extract resources from and record every item, in order.
    ///
    /// Documents are normalized in parallel and committed in input order.
    /// Nothing is recorded unless every item succeeds. Chapter numbering
    /// continues across calls.
    ///
    /// # Errors
    ///
    /// The first failure by input position: [`Error::Normalization`],
    /// [`Error::SecurityViolation`], [`Error::InvalidReference`] or
    /// [`Error::DuplicateId`].
    pub fn load<I>(&mut self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = HtmlItem>,
    {
        let items: Vec<HtmlItem> = items.into_iter().collect();
        let normalizer = Normalizer::new(self.book.title.as_str());

        let normalized: Vec<Result<Normalized>> = items
            .par_iter()
            .enumerate()
            .map(|(index, item)| normalizer.normalize(index, &item.content))
            .collect();

        let mut seen: HashSet<String> = std::iter::once(NAV_ID.to_string())
            .chain(self.documents.iter().map(|d| d.id.clone()))
            .chain(self.resources.iter().map(|r| r.id.clone()))
            .collect();
        let mut documents = Vec::with_capacity(items.len());
        let mut resources = Vec::new();
        let resolver = ResourceResolver::new(&self.root);

        for ((index, item), result) in items.into_iter().enumerate().zip(normalized) {
            let Normalized {
                mut dom,
                diagnostics,
            } = result?;

            let chapter = self.documents.len() + index + 1;
            let id = self.ids.document_id(chapter);
            claim(&mut seen, &id)?;

            let title = item.title.unwrap_or_else(|| heading_title(&dom));
            let extracted = resolver.extract(&mut dom, &id, chapter, self.ids.as_mut())?;
            for resource in &extracted {
                claim(&mut seen, &resource.id)?;
            }
            debug!(%id, %title, resources = extracted.len(), "loaded document");

            resources.extend(extracted);
            documents.push(DocumentRecord {
                target: format!("xhtml/{id}.xhtml"),
                id,
                dom,
                title,
                diagnostics,
            });
        }

        self.documents.extend(documents);
        self.resources.extend(resources);
        Ok(())
    }

    /// Documents in spine order.
    pub fn documents(&self) -> &[DocumentRecord] {
        &self.documents
    }

    /// Resources in discovery order.
    pub fn resources(&self) -> &[ResourceRecord] {
        &self.resources
    }

    pub fn images(&self) -> impl Iterator<Item = &ResourceRecord> {
        self.resources_of(ResourceKind::Image)
    }

    pub fn styles(&self) -> impl Iterator<Item = &ResourceRecord> {
        self.resources_of(ResourceKind::Stylesheet)
    }

    fn resources_of(&self, kind: ResourceKind) -> impl Iterator<Item = &ResourceRecord> {
        self.resources.iter().filter(move |r| r.kind == kind)
    }

    /// Read-only package view over the accumulated state.
    pub fn package(&self) -> Package<'_> {
        Package::new(&self.book, &self.documents, &self.resources)
            .with_nav_linear(self.config.nav_linear)
    }

    /// Write the EPUB archive to `writer`.
    pub fn write<W: Write + Seek>(&self, writer: W) -> Result<()> {
        EpubWriter::new(&self.config, self.loader.as_ref()).write(&self.package(), writer)
    }

    /// Write the EPUB archive to a sink that cannot seek, such as stdout.
    pub fn write_stream<W: Write>(&self, writer: W) -> Result<()> {
        EpubWriter::new(&self.config, self.loader.as_ref()).write_stream(&self.package(), writer)
    }

    /// Write the EPUB archive to a file, removing it again on failure.
    pub fn write_epub_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(Error::ArchiveWrite)?;

        let result = self.write(BufWriter::new(file));
        if result.is_err()
            && let Err(e) = fs::remove_file(path)
        {
            warn!(path = %path.display(), "failed to remove partial archive: {e}");
        }
        result
    }
}

/// Text of the first `h1`, whitespace-collapsed, or empty.
fn heading_title(dom: &ArenaDom) -> String {
    dom.find_by_tag("h1")
        .map(|h1| collapse_whitespace(&dom.text_of(h1)))
        .unwrap_or_default()
}

fn claim(seen: &mut HashSet<String>, id: &str) -> Result<()> {
    if seen.insert(id.to_string()) {
        Ok(())
    } else {
        Err(Error::DuplicateId(id.to_string()))
    }
}
