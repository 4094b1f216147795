//! # iconvault core
//!
//! Fetches SVG icons named `namespace:name` from a remote icon API, keeps
//! them in a write-once on-disk cache and builds the access paths a renderer
//! consumes.
//!
//! ## Architecture
//!
//! - [`flight`]: single-flight cache population; at most one fetch per key
//! - [`cache`]: cache store over the [`fs`] capability
//! - [`classify`]: tintable/plain classification of fetched content
//! - [`path`]: access path construction
//! - [`loader`]: consumer entry point with cancellation and placeholders
//! - [`slot`]: per-widget dirty tracking
//! - [`transport`]: HTTP capability and its reqwest implementation
//!
//! ## Examples
//!
//! ```no_run
//! use std::{sync::Arc, time::Duration};
//!
//! use iconvault_core::{
//!     ApiBase, FetchCoordinator, IconCacheStore, IconKey, IconLoader,
//!     LayoutRect, LocalFileSystem, ReqwestTransport, TintColor,
//! };
//! use tokio_util::sync::CancellationToken;
//!
//! async fn home_icon() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = IconCacheStore::new(Arc::new(LocalFileSystem::new("cache/icons")));
//!     let transport = ReqwestTransport::new(Duration::from_secs(10), "example")?;
//!     let loader = IconLoader::new(FetchCoordinator::new(
//!         store,
//!         Arc::new(transport),
//!         ApiBase::default(),
//!     ));
//!
//!     let key = IconKey::parse("mdi:home")?;
//!     let path = loader
//!         .resolve(
//!             &key,
//!             LayoutRect::new(24.0, 24.0),
//!             Some(TintColor::WHITE),
//!             &CancellationToken::new(),
//!         )
//!         .await?;
//!     println!("{path}");
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

pub mod cache;
pub mod classify;
pub mod error;
pub mod flight;
pub mod fs;
pub mod loader;
pub mod path;
pub mod slot;
pub mod transport;

pub use cache::IconCacheStore;
pub use classify::{TINT_MARKER, classify};
pub use error::{IconError, Result};
pub use flight::{FetchCoordinator, FlightStats, NOT_FOUND_BODY};
pub use fs::{IconFileSystem, LocalFileSystem, MemoryFileSystem};
pub use loader::{IconImage, IconLoader, TextureLoader};
pub use path::{build_access_path, resolve_access_path};
pub use slot::IconSlot;
pub use transport::{
    DEFAULT_USER_AGENT, HttpResponse, IconTransport, ReqwestTransport,
    TransportError,
};

pub use iconvault_model::{
    AccessPath, ApiBase, IconKey, KeyError, LayoutRect, TintColor,
    Tintability,
};
