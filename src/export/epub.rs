//! EPUB archive writer.

use std::io::{self, Read, Seek, Write};

use tracing::{debug, info};
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::{Error, Result};
use crate::io::ResourceLoader;
use crate::package::{
    CONTAINER_PATH, MIMETYPE, MIMETYPE_PATH, NAV_PATH, OPF_PATH, PACKAGE_DIR, Package,
};

const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Configuration for EPUB output.
#[derive(Debug, Clone)]
pub struct EpubConfig {
    /// Compression level for deflate (0-9, default 6).
    ///
    /// Applies to every entry except `mimetype`, which is always stored.
    pub compression_level: Option<u32>,
    /// Whether the navigation document is a linear spine entry (default true).
    pub nav_linear: bool,
}

impl Default for EpubConfig {
    fn default() -> Self {
        Self {
            compression_level: Some(6),
            nav_linear: true,
        }
    }
}

/// Writes a [`Package`] and its resources as an EPUB archive.
///
/// Entries are written in a fixed order: `mimetype` (stored), the container
/// pointer, the package document, the navigation document, every document
/// in spine order, then every resource in discovery order.
pub struct EpubWriter<'a> {
    config: &'a EpubConfig,
    loader: &'a dyn ResourceLoader,
}

impl<'a> EpubWriter<'a> {
    pub fn new(config: &'a EpubConfig, loader: &'a dyn ResourceLoader) -> Self {
        Self { config, loader }
    }

    /// Write the archive to `writer` and finalize it.
    ///
    /// Resource streams are opened one at a time and copied through a fixed
    /// buffer. Any failure abandons the archive; the sink then holds a
    /// truncated zip that must not be published.
    ///
    /// # Errors
    ///
    /// [`Error::ResourceRead`] if a resource cannot be opened or read, and
    /// [`Error::ArchiveWrite`] if the sink rejects a write.
    pub fn write<W: Write + Seek>(&self, package: &Package<'_>, writer: W) -> Result<()> {
        self.write_entries(package, ZipWriter::new(writer))
    }

    /// Write the archive to a sink that cannot seek, such as stdout or a pipe.
    ///
    /// Entry order is the same as [`EpubWriter::write`]; sizes and checksums
    /// follow each entry in data descriptors instead of being patched into
    /// the local headers.
    pub fn write_stream<W: Write>(&self, package: &Package<'_>, writer: W) -> Result<()> {
        self.write_entries(package, ZipWriter::new_stream(writer))
    }

    fn write_entries<W: Write + Seek>(
        &self,
        package: &Package<'_>,
        mut zip: ZipWriter<W>,
    ) -> Result<()> {
        let compression_level = self.config.compression_level.unwrap_or(6);
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        let deflated = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(compression_level as i64));

        // 1. Write mimetype (must be first, uncompressed)
        zip.start_file(MIMETYPE_PATH, stored).map_err(archive_err)?;
        zip.write_all(MIMETYPE.as_bytes()).map_err(Error::ArchiveWrite)?;

        // 2. Control documents
        let controls = [
            (CONTAINER_PATH, package.container_xml()),
            (OPF_PATH, package.package_opf()),
            (NAV_PATH, package.nav_xhtml()),
        ];
        for (path, content) in &controls {
            zip.start_file(*path, deflated).map_err(archive_err)?;
            zip.write_all(content.as_bytes()).map_err(Error::ArchiveWrite)?;
        }

        // 3. Documents in spine order
        for doc in package.documents {
            let path = format!("{PACKAGE_DIR}/{}", doc.target);
            debug!(id = %doc.id, %path, "writing document");
            zip.start_file(path.as_str(), deflated).map_err(archive_err)?;
            zip.write_all(doc.to_xhtml().as_bytes())
                .map_err(Error::ArchiveWrite)?;
        }

        // 4. Resources, streamed from their source
        let mut buf = vec![0u8; COPY_BUFFER_SIZE];
        for resource in package.resources {
            let path = format!("{PACKAGE_DIR}/{}", resource.target);
            let read_err = |source: io::Error| Error::ResourceRead {
                id: resource.id.clone(),
                location: resource.source.to_string(),
                source,
            };

            let mut reader = self.loader.open(&resource.source).map_err(read_err)?;
            debug!(id = %resource.id, source = %resource.source, %path, "writing resource");
            zip.start_file(path.as_str(), deflated).map_err(archive_err)?;

            loop {
                let n = match reader.read(&mut buf) {
                    Ok(0) => break,
                    Ok(n) => n,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(read_err(e)),
                };
                zip.write_all(&buf[..n]).map_err(Error::ArchiveWrite)?;
            }
        }

        zip.finish().map_err(archive_err)?;

        info!(
            documents = package.documents.len(),
            resources = package.resources.len(),
            "wrote EPUB archive"
        );
        Ok(())
    }
}

/// Zip errors surface as archive write failures.
fn archive_err<E: std::error::Error + Send + Sync + 'static>(e: E) -> Error {
    Error::ArchiveWrite(io_error(e))
}

fn io_error<E: std::error::Error + Send + Sync + 'static>(e: E) -> io::Error {
    io::Error::other(e)
}
