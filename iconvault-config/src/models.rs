use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use iconvault_model::ApiBase;

pub const DEFAULT_CACHE_ROOT: &str = "./cache/icons";
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_USER_AGENT: &str =
    concat!("iconvault/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct Config {
    pub cache: CacheConfig,
    pub remote: RemoteConfig,
    pub metadata: ConfigMetadata,
}

impl Config {
    pub fn ensure_directories(&self) -> anyhow::Result<()> {
        self.cache.ensure_directories()
    }

    pub fn normalize_paths(&mut self) -> anyhow::Result<()> {
        self.cache.normalize_paths()
    }

    pub fn cache_root(&self) -> &Path {
        &self.cache.root
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache: CacheConfig {
                root: PathBuf::from(DEFAULT_CACHE_ROOT),
            },
            remote: RemoteConfig::default(),
            metadata: ConfigMetadata::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub root: PathBuf,
}

impl CacheConfig {
    fn ensure_directories(&self) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.root)?;
        Ok(())
    }

    fn normalize_paths(&mut self) -> anyhow::Result<()> {
        self.root = std::fs::canonicalize(&self.root)?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub api_base: ApiBase,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            api_base: ApiBase::default(),
            timeout: DEFAULT_HTTP_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Where the effective configuration came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
}
