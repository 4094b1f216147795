use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub cache: FileCacheConfig,
    #[serde(default)]
    pub remote: FileRemoteConfig,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileCacheConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileRemoteConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    /// humantime syntax, e.g. `"10s"` or `"1m 30s"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

pub const ENV_CONFIG_PATH: &str = "ICONVAULT_CONFIG";
pub const ENV_CACHE_DIR: &str = "ICONVAULT_CACHE_DIR";
pub const ENV_API_BASE: &str = "ICONVAULT_API_BASE";
pub const ENV_HTTP_TIMEOUT: &str = "ICONVAULT_HTTP_TIMEOUT";
pub const ENV_USER_AGENT: &str = "ICONVAULT_USER_AGENT";

/// Environment-derived configuration values.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub cache_root: Option<PathBuf>,
    pub api_base: Option<String>,
    pub http_timeout: Option<String>,
    pub user_agent: Option<String>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };

        Self {
            config_path: var(ENV_CONFIG_PATH).map(PathBuf::from),
            cache_root: var(ENV_CACHE_DIR).map(PathBuf::from),
            api_base: var(ENV_API_BASE),
            http_timeout: var(ENV_HTTP_TIMEOUT),
            user_agent: var(ENV_USER_AGENT),
        }
    }
}
