//! Configuration for iconvault processes.
//!
//! Values resolve in order: environment (after an optional `.env`), then
//! `iconvault.toml`, then built-in defaults.

#![allow(missing_docs)]

pub mod error;
pub mod loader;
pub mod models;
pub mod sources;
pub mod validation;

pub use error::ConfigLoadError;
pub use loader::{ConfigLoad, ConfigLoader, ConfigLoaderOptions};
pub use models::{
    CacheConfig, Config, ConfigMetadata, DEFAULT_CACHE_ROOT,
    DEFAULT_HTTP_TIMEOUT, DEFAULT_USER_AGENT, RemoteConfig,
};
pub use sources::{EnvConfig, FileConfig};
pub use validation::{ConfigWarning, ConfigWarnings};
