//! Core data model for a conversion.
//!
//! This module contains:
//! - Book metadata supplied by the caller
//! - Input HTML items
//! - Document and resource records accumulated while loading

mod book;
mod records;

pub use book::{Book, Contributor, DEFAULT_LANGUAGE, HtmlItem};
pub use records::{DocumentRecord, ResourceKind, ResourceRecord};
