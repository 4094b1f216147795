//! Access paths handed to the rendering collaborator.

use iconvault_model::{AccessPath, IconKey, LayoutRect, TintColor, Tintability};

use crate::cache::IconCacheStore;

/// `<cache path>?[color=<hex>&]w=<int>&h=<int>`.
///
/// Pure: identical inputs give byte-identical paths. The color is only
/// encoded for tintable entries.
pub fn build_access_path(
    key: &IconKey,
    tintability: Tintability,
    rect: LayoutRect,
    tint: Option<TintColor>,
) -> AccessPath {
    let (width, height) = rect.raster_size();
    let mut path = key.cache_path_for(tintability);
    path.push('?');

    if let (Tintability::Tintable, Some(color)) = (tintability, tint) {
        path.push_str("color=");
        path.push_str(&color.hex());
        path.push('&');
    }

    path.push_str(&format!("w={width}&h={height}"));
    AccessPath::new(path)
}

/// Build the access path from the variant currently on disk.
///
/// Tintability is looked up on every call rather than remembered, so the
/// result follows the cache.
pub async fn resolve_access_path(
    store: &IconCacheStore,
    key: &IconKey,
    rect: LayoutRect,
    tint: Option<TintColor>,
) -> AccessPath {
    let tintability = Tintability::from(store.is_tintable(key).await);
    build_access_path(key, tintability, rect, tint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::{IconFileSystem, MemoryFileSystem};
    use std::sync::Arc;

    fn home() -> IconKey {
        IconKey::parse("mdi:home").unwrap()
    }

    #[test]
    fn small_rects_clamp_to_minimum() {
        let path = build_access_path(
            &home(),
            Tintability::Plain,
            LayoutRect::new(10.0, 10.0),
            None,
        );
        assert_eq!(path.as_str(), "mdi/home.svg?w=32&h=32");
    }

    #[test]
    fn tint_is_only_encoded_for_tintable_entries() {
        let rect = LayoutRect::new(64.0, 48.0);
        let tint = Some(TintColor::rgb(0x12, 0x34, 0x56));

        assert_eq!(
            build_access_path(&home(), Tintability::Tintable, rect, tint).as_str(),
            "mdi/home.t.svg?color=#123456&w=64&h=48"
        );
        assert_eq!(
            build_access_path(&home(), Tintability::Plain, rect, tint).as_str(),
            "mdi/home.svg?w=64&h=48"
        );
        assert_eq!(
            build_access_path(&home(), Tintability::Tintable, rect, None).as_str(),
            "mdi/home.t.svg?w=64&h=48"
        );
    }

    #[test]
    fn identical_inputs_give_identical_paths() {
        let rect = LayoutRect::new(33.3, 120.0);
        let tint = Some(TintColor::WHITE);
        let first = build_access_path(&home(), Tintability::Tintable, rect, tint);
        for _ in 0..10 {
            assert_eq!(
                build_access_path(&home(), Tintability::Tintable, rect, tint),
                first
            );
        }
    }

    #[tokio::test]
    async fn resolution_follows_the_file_on_disk() {
        let fs = Arc::new(MemoryFileSystem::new());
        let store = IconCacheStore::new(fs.clone());
        let rect = LayoutRect::new(16.0, 16.0);
        let tint = Some(TintColor::WHITE);

        assert_eq!(
            resolve_access_path(&store, &home(), rect, tint).await.as_str(),
            "mdi/home.svg?w=32&h=32"
        );

        fs.create_dir("mdi").await.unwrap();
        fs.write_text("mdi/home.t.svg", "<svg/>").await.unwrap();

        assert_eq!(
            resolve_access_path(&store, &home(), rect, tint).await.as_str(),
            "mdi/home.t.svg?color=#ffffff&w=32&h=32"
        );
    }
}
