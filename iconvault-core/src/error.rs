use iconvault_model::KeyError;
use thiserror::Error;

/// Failures surfaced by the icon cache.
///
/// `Clone` so a single fetch outcome can be handed to every caller that was
/// waiting on it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IconError {
    #[error(transparent)]
    InvalidKeyFormat(#[from] KeyError),

    #[error("Icon not found: {key}")]
    FetchNotFound { key: String },

    #[error("Failed to fetch {url}: {message}")]
    FetchTransport { url: String, message: String },

    #[error("Failed to write cache entry {path}: {message}")]
    CacheWrite { path: String, message: String },

    #[error("Operation cancelled: {0}")]
    CancelledByCaller(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IconError {
    /// True for failures of a fetch attempt. None of these leave a cache
    /// entry behind; a later request may retry.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            IconError::FetchNotFound { .. }
                | IconError::FetchTransport { .. }
                | IconError::CacheWrite { .. }
                | IconError::Internal(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, IconError>;
