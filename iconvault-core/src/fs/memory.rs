use std::io;

use async_trait::async_trait;
use dashmap::{DashMap, DashSet};

use super::IconFileSystem;

/// In-process cache backend. Mirrors the local backend's rules: writes need
/// the parent directory to exist and directories never count as entries.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: DashMap<String, Vec<u8>>,
    dirs: DashSet<String>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sorted list of stored file paths.
    pub fn files(&self) -> Vec<String> {
        let mut paths: Vec<String> =
            self.files.iter().map(|entry| entry.key().clone()).collect();
        paths.sort();
        paths
    }

    fn normalize(path: &str) -> String {
        path.split('/')
            .filter(|part| !part.is_empty() && *part != ".")
            .collect::<Vec<_>>()
            .join("/")
    }

    fn parent(path: &str) -> Option<&str> {
        path.rsplit_once('/').map(|(parent, _)| parent)
    }
}

#[async_trait]
impl IconFileSystem for MemoryFileSystem {
    async fn exists(&self, path: &str) -> bool {
        self.files.contains_key(&Self::normalize(path))
    }

    async fn create_dir(&self, path: &str) -> io::Result<()> {
        let path = Self::normalize(path);
        let mut current = String::new();
        for part in path.split('/').filter(|part| !part.is_empty()) {
            if !current.is_empty() {
                current.push('/');
            }
            current.push_str(part);
            if self.files.contains_key(&current) {
                return Err(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("{current} is a file"),
                ));
            }
            self.dirs.insert(current.clone());
        }
        Ok(())
    }

    async fn write_text(&self, path: &str, contents: &str) -> io::Result<()> {
        let path = Self::normalize(path);
        if let Some(parent) = Self::parent(&path)
            && !self.dirs.contains(parent)
        {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("directory {parent} does not exist"),
            ));
        }
        self.files.insert(path, contents.as_bytes().to_vec());
        Ok(())
    }

    async fn read_all(&self, path: &str) -> io::Result<Vec<u8>> {
        self.files
            .get(&Self::normalize(path))
            .map(|entry| entry.value().clone())
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, path.to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_require_parent_directory() {
        let fs = MemoryFileSystem::new();
        let err = fs.write_text("mdi/home.svg", "x").await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);

        fs.create_dir("mdi").await.unwrap();
        fs.write_text("mdi/home.svg", "x").await.unwrap();
        assert!(fs.exists("mdi/home.svg").await);
        assert!(!fs.exists("mdi").await);
        assert_eq!(fs.files(), vec!["mdi/home.svg".to_string()]);
    }

    #[tokio::test]
    async fn create_dir_over_file_fails() {
        let fs = MemoryFileSystem::new();
        fs.write_text("mdi", "not a dir").await.unwrap();
        assert!(fs.create_dir("mdi").await.is_err());
    }
}
