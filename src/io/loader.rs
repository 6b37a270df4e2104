use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Cursor, Read};

use url::Url;

/// Opens resource byte streams on demand.
///
/// The archive writer opens one stream at a time and drops it once copied,
/// so a book never needs all of its resource bytes in memory at once.
pub trait ResourceLoader: Send + Sync {
    /// Open a stream over the bytes at `location`.
    fn open<'a>(&'a self, location: &Url) -> io::Result<Box<dyn Read + 'a>>;
}

// --- Implementation: Local File ---

/// Loads `file:` URLs from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileLoader;

impl ResourceLoader for FileLoader {
    fn open<'a>(&'a self, location: &Url) -> io::Result<Box<dyn Read + 'a>> {
        let path = location.to_file_path().map_err(|()| {
            io::Error::new(
                io::ErrorKind::Unsupported,
                format!("{location} is not a local file"),
            )
        })?;
        Ok(Box::new(File::open(path)?))
    }
}

// --- Implementation: In-Memory ---

/// Serves resources from a map keyed by their full URL.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, location: &Url, data: impl Into<Vec<u8>>) {
        self.entries.insert(location.as_str().to_string(), data.into());
    }

    pub fn with(mut self, location: &Url, data: impl Into<Vec<u8>>) -> Self {
        self.insert(location, data);
        self
    }
}

impl ResourceLoader for MemoryLoader {
    fn open<'a>(&'a self, location: &Url) -> io::Result<Box<dyn Read + 'a>> {
        let data = self.entries.get(location.as_str()).ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no resource at {location}"))
        })?;
        Ok(Box::new(Cursor::new(data.as_slice())))
    }
}
