//! On-disk icon cache.
//!
//! File existence is the source of truth: an icon is cached iff its plain or
//! its tintable path exists, and at most one of the two ever does.

use std::{any::type_name_of_val, fmt, sync::Arc};

use iconvault_model::{IconKey, Tintability};
use tracing::debug;

use crate::{
    error::{IconError, Result},
    fs::IconFileSystem,
};

#[derive(Clone)]
pub struct IconCacheStore {
    fs: Arc<dyn IconFileSystem>,
}

impl fmt::Debug for IconCacheStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IconCacheStore")
            .field("filesystem", &type_name_of_val(self.fs.as_ref()))
            .finish()
    }
}

impl IconCacheStore {
    pub fn new(fs: Arc<dyn IconFileSystem>) -> Self {
        Self { fs }
    }

    pub fn filesystem(&self) -> &Arc<dyn IconFileSystem> {
        &self.fs
    }

    /// Variant currently on disk, if any. The tintable path wins.
    pub async fn cached_variant(&self, key: &IconKey) -> Option<Tintability> {
        if self.fs.exists(&key.cache_tintable_path()).await {
            Some(Tintability::Tintable)
        } else if self.fs.exists(&key.cache_path()).await {
            Some(Tintability::Plain)
        } else {
            None
        }
    }

    pub async fn is_cached(&self, key: &IconKey) -> bool {
        self.cached_variant(key).await.is_some()
    }

    pub async fn is_tintable(&self, key: &IconKey) -> bool {
        self.fs.exists(&key.cache_tintable_path()).await
    }

    /// Store fetched content under the path for `tintability` and return
    /// that path. Only the fetch leader calls this, once per key.
    pub async fn persist(
        &self,
        key: &IconKey,
        tintability: Tintability,
        contents: &str,
    ) -> Result<String> {
        let path = key.cache_path_for(tintability);
        let write_err = |err: std::io::Error| IconError::CacheWrite {
            path: path.clone(),
            message: err.to_string(),
        };

        self.fs.create_dir(key.cache_dir()).await.map_err(write_err)?;
        self.fs.write_text(&path, contents).await.map_err(write_err)?;

        debug!(icon = %key, %path, %tintability, bytes = contents.len(), "cached icon");
        Ok(path)
    }

    /// Raw bytes of a cache file, for texture loaders.
    pub async fn read(&self, path: &str) -> Result<Vec<u8>> {
        self.fs.read_all(path).await.map_err(|err| {
            IconError::Internal(format!("Failed to read cache file {path}: {err}"))
        })
    }
}
