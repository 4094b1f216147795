use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("configuration file {path} does not exist")]
    MissingConfig { path: PathBuf },
    #[error("failed to read configuration file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid API base '{value}'")]
    InvalidApiBase {
        value: String,
        #[source]
        source: iconvault_model::ModelError,
    },
    #[error("invalid HTTP timeout '{value}'")]
    InvalidTimeout {
        value: String,
        #[source]
        source: humantime::DurationError,
    },
    #[error("HTTP timeout must be greater than zero")]
    ZeroTimeout,
    #[error("user agent must not be empty")]
    EmptyUserAgent,
    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}
