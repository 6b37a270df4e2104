//! Error types for html-epub operations.

use std::io;

use thiserror::Error;

/// Errors that can occur while loading documents or writing the archive.
///
/// Every variant aborts the whole conversion: there is no partial book.
#[derive(Error, Debug)]
pub enum Error {
    /// The normalizer produced no usable output for an input document.
    #[error("document {index} failed to normalize: {reason}")]
    Normalization { index: usize, reason: String },

    /// A resource reference resolved outside the configured resource root.
    #[error("resource `{reference}` in {document} resolves to `{resolved}`, outside the resource root")]
    SecurityViolation {
        document: String,
        reference: String,
        resolved: String,
    },

    /// A resource reference could not be resolved against the resource root.
    #[error("resource `{reference}` in {document} is not a valid reference: {reason}")]
    InvalidReference {
        document: String,
        reference: String,
        reason: String,
    },

    #[error("invalid resource root: {0}")]
    InvalidResourceRoot(String),

    /// Two manifest entries were allocated the same identifier.
    #[error("duplicate manifest identifier: {0}")]
    DuplicateId(String),

    /// A resource byte stream could not be opened or fully read.
    #[error("failed to read resource {id} from {location}: {source}")]
    ResourceRead {
        id: String,
        location: String,
        #[source]
        source: io::Error,
    },

    /// The output sink rejected a write.
    #[error("failed to write archive: {0}")]
    ArchiveWrite(#[source] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
