//! # html-epub
//!
//! Package an ordered sequence of HTML documents into an EPUB 3 container.
//!
//! ## Features
//!
//! - Normalizes arbitrary real-world HTML into well-formed XHTML
//! - Extracts images and stylesheets, refusing references that escape the
//!   resource root
//! - Generates the container pointer, OPF package document and navigation
//!   document
//! - Streams the archive in the order reading systems require, reading
//!   resource bytes lazily
//!
//! ## Quick Start
//!
//! ```no_run
//! use html_epub::{Book, Contributor, EpubBuilder, HtmlItem, ResourceRoot};
//!
//! let book = Book::new("urn:isbn:9780000000000", "My Book")
//!     .with_language("en")
//!     .with_contributor(Contributor::new("Editor Name").with_role("edt"));
//! let root = ResourceRoot::from_dir("book/data")?;
//!
//! let mut builder = EpubBuilder::new(book, root);
//! builder.load(vec![
//!     HtmlItem::new(std::fs::read("book/data/ch1.html").unwrap()),
//!     HtmlItem::new(std::fs::read("book/data/ch2.html").unwrap()).with_title("Interlude"),
//! ])?;
//! builder.write_epub_file("my-book.epub")?;
//! # Ok::<(), html_epub::Error>(())
//! ```
//!
//! ## Archive Layout
//!
//! ```text
//! mimetype                   stored, "application/epub+zip"
//! META-INF/container.xml
//! EPUB/package.opf
//! EPUB/toc.xhtml
//! EPUB/xhtml/<doc-id>.xhtml
//! EPUB/images/<res-id>.<ext>
//! EPUB/styles/<res-id>.css
//! ```

pub mod builder;
pub mod dom;
pub mod error;
pub mod export;
pub mod ids;
pub mod io;
pub mod model;
pub mod normalize;
pub mod package;
pub mod resources;
pub(crate) mod util;

pub use builder::EpubBuilder;
pub use error::{Error, Result};
pub use export::{EpubConfig, EpubWriter};
pub use ids::{ChapterIds, IdAllocator};
pub use io::{FileLoader, MemoryLoader, ResourceLoader};
pub use model::{Book, Contributor, DocumentRecord, HtmlItem, ResourceKind, ResourceRecord};
pub use normalize::{Normalized, Normalizer};
pub use package::{ContentProperties, Package};
pub use resources::{ResourceResolver, ResourceRoot};
