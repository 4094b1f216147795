//! Filesystem capability consumed by the cache store.
//!
//! Paths are cache-relative and `/`-separated (`mdi/home.svg`). Backends
//! decide where the cache root actually lives.

mod local;
mod memory;

pub use local::LocalFileSystem;
pub use memory::MemoryFileSystem;

use async_trait::async_trait;
use std::io;

#[async_trait]
pub trait IconFileSystem: Send + Sync {
    /// True only for files; a bare directory is not a cache entry.
    async fn exists(&self, path: &str) -> bool;

    /// Create `path` and any missing parents. Existing directories are fine.
    async fn create_dir(&self, path: &str) -> io::Result<()>;

    /// Write `contents` so that `exists` only reports true once the whole
    /// file is in place.
    async fn write_text(&self, path: &str, contents: &str) -> io::Result<()>;

    async fn read_all(&self, path: &str) -> io::Result<Vec<u8>>;
}
