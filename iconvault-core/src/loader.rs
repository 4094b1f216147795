use async_trait::async_trait;
use iconvault_model::{AccessPath, IconKey, LayoutRect, TintColor};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::{
    cache::IconCacheStore,
    error::{IconError, Result},
    flight::FetchCoordinator,
    path::resolve_access_path,
};

/// External renderer that decodes a cached icon into a texture.
#[async_trait]
pub trait TextureLoader: Send + Sync {
    type Texture: Send;

    async fn load(
        &self,
        store: &IconCacheStore,
        path: &AccessPath,
    ) -> Result<Self::Texture>;
}

/// What a consumer should draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconImage<T> {
    /// Nothing usable yet (or the fetch failed): draw a neutral image.
    Placeholder,
    Ready(T),
}

impl<T> Default for IconImage<T> {
    fn default() -> Self {
        IconImage::Placeholder
    }
}

impl<T> IconImage<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            IconImage::Ready(value) => Some(value),
            IconImage::Placeholder => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, IconImage::Placeholder)
    }
}

/// Consumer-facing entry point: cache population, path building and the
/// caller's cancellation.
#[derive(Clone, Debug)]
pub struct IconLoader {
    coordinator: FetchCoordinator,
}

impl IconLoader {
    pub fn new(coordinator: FetchCoordinator) -> Self {
        Self { coordinator }
    }

    pub fn coordinator(&self) -> &FetchCoordinator {
        &self.coordinator
    }

    /// Ensure `key` is cached and build its access path.
    ///
    /// Cancelling `cancel` only stops this caller from waiting. The fetch
    /// itself keeps running on its own task so the icon still ends up cached
    /// for everyone else.
    pub async fn resolve(
        &self,
        key: &IconKey,
        rect: LayoutRect,
        tint: Option<TintColor>,
        cancel: &CancellationToken,
    ) -> Result<AccessPath> {
        // The cache check and claim run detached too; a caller that is
        // already cancelled must still start the population.
        let population = {
            let coordinator = self.coordinator.clone();
            let key = key.clone();
            tokio::spawn(async move { coordinator.ensure_cached(&key).await })
        };

        tokio::select! {
            biased;
            cached = population => {
                cached.map_err(|err| {
                    IconError::Internal(format!("icon population task failed: {err}"))
                })??;
            }
            _ = cancel.cancelled() => return Err(cancelled(key)),
        }
        if cancel.is_cancelled() {
            return Err(cancelled(key));
        }

        Ok(resolve_access_path(self.coordinator.store(), key, rect, tint).await)
    }

    /// Like [`IconLoader::resolve`], but fetch failures become
    /// [`IconImage::Placeholder`]. Only cancellation is returned as an error.
    pub async fn resolve_or_placeholder(
        &self,
        key: &IconKey,
        rect: LayoutRect,
        tint: Option<TintColor>,
        cancel: &CancellationToken,
    ) -> Result<IconImage<AccessPath>> {
        match self.resolve(key, rect, tint, cancel).await {
            Ok(path) => Ok(IconImage::Ready(path)),
            Err(err) if err.is_fetch_failure() => {
                warn!(icon = %key, error = %err, "no image available, using placeholder");
                Ok(IconImage::Placeholder)
            }
            Err(err) => Err(err),
        }
    }

    /// Parse `raw` as `namespace:name` first. A malformed key fails
    /// immediately with [`IconError::InvalidKeyFormat`].
    pub async fn resolve_str(
        &self,
        raw: &str,
        rect: LayoutRect,
        tint: Option<TintColor>,
        cancel: &CancellationToken,
    ) -> Result<IconImage<AccessPath>> {
        let key = IconKey::parse(raw)?;
        self.resolve_or_placeholder(&key, rect, tint, cancel).await
    }

    /// Resolve the icon and hand its access path to `textures`.
    pub async fn load_texture<L>(
        &self,
        key: &IconKey,
        rect: LayoutRect,
        tint: Option<TintColor>,
        textures: &L,
        cancel: &CancellationToken,
    ) -> Result<L::Texture>
    where
        L: TextureLoader + ?Sized,
    {
        let path = self.resolve(key, rect, tint, cancel).await?;
        let texture = textures.load(self.coordinator.store(), &path).await?;
        if cancel.is_cancelled() {
            return Err(cancelled(key));
        }
        Ok(texture)
    }
}

fn cancelled(key: &IconKey) -> IconError {
    IconError::CancelledByCaller(format!("load of {key}"))
}
