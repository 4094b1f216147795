//! Display state for a single icon, independent of any UI toolkit.
//!
//! A widget owns one [`IconSlot`], forwards property and layout changes to
//! it, and calls [`IconSlot::refresh`] after rendering. Drawing whatever
//! [`IconSlot::image`] holds is the widget's job.

use iconvault_model::{AccessPath, IconKey, LayoutRect, TintColor};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::loader::{IconImage, IconLoader};

#[derive(Debug, Clone, Default)]
pub struct IconSlot {
    icon: String,
    rect: LayoutRect,
    dirty: bool,
    image: IconImage<AccessPath>,
}

impl IconSlot {
    pub fn new(icon: impl Into<String>) -> Self {
        let icon = icon.into();
        Self {
            dirty: !icon.is_empty(),
            icon,
            ..Self::default()
        }
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }

    pub fn rect(&self) -> LayoutRect {
        self.rect
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn image(&self) -> &IconImage<AccessPath> {
        &self.image
    }

    /// Returns whether the icon changed.
    pub fn set_icon(&mut self, icon: impl Into<String>) -> bool {
        let icon = icon.into();
        if self.icon == icon {
            return false;
        }
        self.icon = icon;
        self.dirty = true;
        true
    }

    /// Markup-style setter: `icon` and `name` (any case) both set the icon.
    pub fn set_property(&mut self, name: &str, value: &str) -> bool {
        if name.eq_ignore_ascii_case("icon") || name.eq_ignore_ascii_case("name")
        {
            self.set_icon(value)
        } else {
            false
        }
    }

    pub fn on_layout(&mut self, rect: LayoutRect) {
        self.rect = rect;
        self.dirty = true;
    }

    /// Re-resolve the icon if anything changed since the last refresh.
    ///
    /// The slot shows the placeholder until resolution succeeds; malformed
    /// keys and failed fetches leave it there. Returns whether any work was
    /// done.
    pub async fn refresh(
        &mut self,
        loader: &IconLoader,
        tint: Option<TintColor>,
    ) -> bool {
        if !self.dirty {
            return false;
        }
        self.dirty = false;
        self.image = IconImage::Placeholder;

        let key = match IconKey::parse(&self.icon) {
            Ok(key) => key,
            Err(err) => {
                warn!(icon = %self.icon, error = %err, "invalid icon name");
                return true;
            }
        };

        match loader
            .resolve_or_placeholder(&key, self.rect, tint, &CancellationToken::new())
            .await
        {
            Ok(image) => {
                if let IconImage::Ready(path) = &image {
                    debug!(icon = %key, %path, "icon ready");
                }
                self.image = image;
            }
            Err(err) => warn!(icon = %key, error = %err, "icon refresh failed"),
        }
        true
    }
}
