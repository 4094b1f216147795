use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use iconvault_model::ApiBase;

use crate::{
    error::ConfigLoadError,
    models::{
        CacheConfig, Config, ConfigMetadata, DEFAULT_CACHE_ROOT,
        DEFAULT_HTTP_TIMEOUT, DEFAULT_USER_AGENT, RemoteConfig,
    },
    sources::{EnvConfig, FileConfig},
    validation::ConfigWarnings,
};

const DEFAULT_CONFIG_LOCATIONS: [&str; 2] =
    ["iconvault.toml", "config/iconvault.toml"];

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
    /// Wins over the environment and the file.
    pub cache_root: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}

enum PathProvenance {
    Required,
    Discovered,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    pub fn with_cache_root<P: Into<PathBuf>>(mut self, root: P) -> Self {
        self.options.cache_root = Some(root.into());
        self
    }

    /// Load `.env`, then the process environment, then the TOML file.
    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true).or_else(
                |err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                },
            )?,
            None => {
                dotenvy::dotenv().map(|_| true).or_else(|err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                })?
            }
        };

        let mut load = self.load_with_env(EnvConfig::gather())?;
        load.config.metadata.env_file_loaded = env_file_loaded;
        Ok(load)
    }

    /// Resolve against an already gathered environment. No `.env` file is read.
    pub fn load_with_env(
        &self,
        env: EnvConfig,
    ) -> Result<ConfigLoad, ConfigLoadError> {
        let (file_config, config_path) = self.load_file_config(&env)?;
        compose_config(
            file_config,
            env,
            self.options.cache_root.clone(),
            config_path,
        )
    }

    fn load_file_config(
        &self,
        env: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        let resolved = self
            .options
            .config_path
            .clone()
            .or_else(|| env.config_path.clone())
            .map(|path| (path, PathProvenance::Required))
            .or_else(|| {
                DEFAULT_CONFIG_LOCATIONS
                    .iter()
                    .map(PathBuf::from)
                    .find(|candidate| candidate.exists())
                    .map(|path| (path, PathProvenance::Discovered))
            });

        let Some((path, provenance)) = resolved else {
            return Ok((None, None));
        };

        if !path.exists() {
            return match provenance {
                PathProvenance::Required => {
                    Err(ConfigLoadError::MissingConfig { path })
                }
                PathProvenance::Discovered => Ok((None, None)),
            };
        }

        let file_config = read_file_config(&path)?;
        Ok((Some(file_config), Some(path)))
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigLoadError> {
    let contents =
        fs::read_to_string(path).map_err(|err| ConfigLoadError::Io {
            path: path.to_path_buf(),
            source: err,
        })?;
    toml::from_str(&contents).map_err(|err| ConfigLoadError::Parse {
        path: path.to_path_buf(),
        source: err,
    })
}

fn compose_config(
    file_config: Option<FileConfig>,
    env: EnvConfig,
    cache_root: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<ConfigLoad, ConfigLoadError> {
    let mut warnings = ConfigWarnings::default();

    if file_config.is_none() {
        warnings.push_with_hint(
            "No iconvault.toml detected; using environment variables and defaults",
            "Create iconvault.toml or set ICONVAULT_CONFIG to pin the settings",
        );
    }

    let FileConfig {
        cache: file_cache,
        remote: file_remote,
    } = file_config.unwrap_or_default();

    let root = cache_root
        .or(env.cache_root)
        .or(file_cache.root)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_ROOT));
    if root.is_relative() {
        warnings.push_with_hint(
            format!(
                "Cache root {} is relative to the working directory",
                root.display()
            ),
            "Use an absolute path so every process shares one cache",
        );
    }

    let api_base = match env.api_base.or(file_remote.api_base) {
        Some(value) => ApiBase::parse(&value).map_err(|source| {
            ConfigLoadError::InvalidApiBase { value, source }
        })?,
        None => ApiBase::default(),
    };
    if api_base.as_url().scheme() == "http" {
        warnings.push(format!("API base {api_base} is not using TLS"));
    }

    let timeout = match env.http_timeout.or(file_remote.timeout) {
        Some(value) => parse_timeout(value)?,
        None => DEFAULT_HTTP_TIMEOUT,
    };

    let user_agent = env
        .user_agent
        .or(file_remote.user_agent)
        .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
    if user_agent.trim().is_empty() {
        return Err(ConfigLoadError::EmptyUserAgent);
    }

    let config = Config {
        cache: CacheConfig { root },
        remote: RemoteConfig {
            api_base,
            timeout,
            user_agent,
        },
        metadata: ConfigMetadata {
            config_path,
            env_file_loaded: false,
        },
    };

    Ok(ConfigLoad { config, warnings })
}

fn parse_timeout(value: String) -> Result<Duration, ConfigLoadError> {
    let timeout = humantime::parse_duration(&value)
        .map_err(|source| ConfigLoadError::InvalidTimeout { value, source })?;
    if timeout.is_zero() {
        return Err(ConfigLoadError::ZeroTimeout);
    }
    Ok(timeout)
}
