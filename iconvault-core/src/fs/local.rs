use std::{
    io,
    path::{Component, Path, PathBuf},
};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use super::IconFileSystem;

/// Cache rooted at a directory on the local disk.
#[derive(Clone, Debug)]
pub struct LocalFileSystem {
    root: PathBuf,
}

impl LocalFileSystem {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a cache-relative path under the root. Absolute paths and `..`
    /// segments are refused so an entry can never land outside the cache.
    pub fn resolve(&self, path: &str) -> io::Result<PathBuf> {
        let relative = Path::new(path);
        let mut resolved = self.root.clone();
        for component in relative.components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                Component::ParentDir
                | Component::RootDir
                | Component::Prefix(_) => {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("cache path escapes root: {path}"),
                    ));
                }
            }
        }
        Ok(resolved)
    }
}

#[async_trait]
impl IconFileSystem for LocalFileSystem {
    async fn exists(&self, path: &str) -> bool {
        let Ok(resolved) = self.resolve(path) else {
            return false;
        };
        tokio::fs::metadata(resolved)
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false)
    }

    async fn create_dir(&self, path: &str) -> io::Result<()> {
        tokio::fs::create_dir_all(self.resolve(path)?).await
    }

    /// Best-effort atomic write (tmp + rename).
    async fn write_text(&self, path: &str, contents: &str) -> io::Result<()> {
        let target = self.resolve(path)?;
        let file_name = target
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("cache path has no file name: {path}"),
                )
            })?;
        let tmp = target.with_file_name(format!(
            ".{file_name}.tmp-{}",
            Uuid::new_v4().simple()
        ));

        let written = async {
            let mut file = tokio::fs::File::create(&tmp).await?;
            file.write_all(contents.as_bytes()).await?;
            file.flush().await?;
            drop(file);
            tokio::fs::rename(&tmp, &target).await
        }
        .await;

        if written.is_err() {
            let _ = tokio::fs::remove_file(&tmp).await;
        }
        written
    }

    async fn read_all(&self, path: &str) -> io::Result<Vec<u8>> {
        tokio::fs::read(self.resolve(path)?).await
    }
}
