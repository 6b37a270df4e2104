//! Archive assembly.
//!
//! Streams the package documents, normalized documents and resource bytes
//! into a zip container laid out as an EPUB 3 publication.
//!
//! # Example
//!
//! ```no_run
//! use html_epub::{Book, EpubBuilder, HtmlItem, ResourceRoot};
//! use std::fs::File;
//!
//! let root = ResourceRoot::from_dir("data")?;
//! let mut builder = EpubBuilder::new(Book::new("urn:isbn:0000000000", "Title"), root);
//! builder.load(vec![HtmlItem::new(b"<h1>One</h1>".to_vec())])?;
//!
//! let mut file = File::create("output.epub").map_err(html_epub::Error::ArchiveWrite)?;
//! builder.write(&mut file)?;
//! # Ok::<(), html_epub::Error>(())
//! ```

mod epub;

pub use epub::{EpubConfig, EpubWriter};
