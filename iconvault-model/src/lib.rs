//! Core data model definitions shared across iconvault crates.
#![allow(missing_docs)]

pub mod error;
pub mod key;
pub mod presentation;
pub mod variant;

pub use error::{KeyError, ModelError, Result as ModelResult};
pub use key::{ApiBase, DEFAULT_API_BASE, IconKey};
pub use presentation::{AccessPath, LayoutRect, MIN_DIMENSION, TintColor};
pub use variant::Tintability;
