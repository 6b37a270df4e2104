//! Resource byte sources.

mod loader;

pub use loader::{FileLoader, MemoryLoader, ResourceLoader};
