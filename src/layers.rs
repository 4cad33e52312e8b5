use std::sync::Arc;

use image::RgbaImage;
use tracing::{debug, warn};

use crate::cache::BucketCache;
use crate::composite;
use crate::fetch::{self, ImageSource};
use crate::registry::Site;
use crate::urls;

/// Build the static layer stack for one site: the base map, then each
/// overlay alpha-composited in order. A missing overlay is skipped (partial
/// overlays are acceptable); a missing base map means there is nothing to
/// build on. An overlay that fails to composite is logged and skipped so one
/// corrupt layer cannot take the whole background down.
pub async fn build_background(source: &dyn ImageSource, site: &Site) -> Option<RgbaImage> {
    let Some(mut background) = fetch::fetch_image(source, &urls::background_url(site.id)).await
    else {
        debug!(site = site.name, "base map unavailable");
        return None;
    };
    for layer in urls::OVERLAY_LAYERS {
        match fetch::fetch_image(source, &urls::overlay_url(site.id, layer)).await {
            Some(overlay) => {
                if let Err(error) = composite::alpha_over(&mut background, &overlay) {
                    warn!(site = site.name, layer, %error, "overlay composite failed, skipping");
                }
            }
            None => debug!(site = site.name, layer, "overlay unavailable, skipping"),
        }
    }
    Some(background)
}

/// Bucket-cached background for one site. Absent results are cached too:
/// a window with no base map stays empty until the next bucket retries.
pub struct BackgroundCache {
    inner: BucketCache<Option<Arc<RgbaImage>>>,
}

impl Default for BackgroundCache {
    fn default() -> Self {
        Self::new()
    }
}

impl BackgroundCache {
    pub fn new() -> Self {
        Self {
            inner: BucketCache::new(),
        }
    }

    pub async fn get(
        &self,
        source: &dyn ImageSource,
        site: &'static Site,
        bucket: i64,
    ) -> Option<Arc<RgbaImage>> {
        self.inner
            .get_or_insert_with(bucket, async {
                debug!(site = site.name, bucket, "building background");
                build_background(source, site).await.map(Arc::new)
            })
            .await
    }
}

/// Bucket-cached colorbar legend. The legend is one static upstream asset
/// with no site component, so this cache can be cloned into every site's
/// loop builder and shared.
#[derive(Clone, Default)]
pub struct LegendCache {
    inner: Arc<BucketCache<Option<Arc<RgbaImage>>>>,
}

impl LegendCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, source: &dyn ImageSource, bucket: i64) -> Option<Arc<RgbaImage>> {
        self.inner
            .get_or_insert_with(bucket, async {
                debug!(bucket, "fetching legend");
                fetch::fetch_image(source, &urls::legend_url())
                    .await
                    .map(Arc::new)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use image::Rgba;

    use super::*;
    use crate::registry;

    struct CountingSource {
        bodies: HashMap<String, Vec<u8>>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ImageSource for CountingSource {
        async fn fetch_bytes(&self, url: &str) -> Option<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.bodies.get(url).cloned()
        }
    }

    fn png(rgba: [u8; 4]) -> Vec<u8> {
        let img = RgbaImage::from_pixel(4, 4, Rgba(rgba));
        let mut buf = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut buf, image::ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    fn site() -> &'static Site {
        registry::lookup("Albany").unwrap()
    }

    #[tokio::test]
    async fn missing_base_map_yields_absent_background() {
        let source = CountingSource {
            bodies: HashMap::from([(urls::overlay_url(site().id, "range"), png([0, 0, 0, 255]))]),
            calls: AtomicUsize::new(0),
        };
        assert!(build_background(&source, site()).await.is_none());
    }

    #[tokio::test]
    async fn missing_overlays_are_skipped() {
        // Base map plus one of three overlays: still a usable background.
        let source = CountingSource {
            bodies: HashMap::from([
                (urls::background_url(site().id), png([0, 0, 255, 255])),
                (
                    urls::overlay_url(site().id, "topography"),
                    png([255, 0, 0, 255]),
                ),
            ]),
            calls: AtomicUsize::new(0),
        };
        let background = build_background(&source, site()).await.unwrap();
        assert_eq!(background.get_pixel(0, 0).0, [255, 0, 0, 255]);
    }

    #[tokio::test]
    async fn background_cache_is_per_bucket() {
        let source = CountingSource {
            bodies: HashMap::from([(urls::background_url(site().id), png([0, 0, 255, 255]))]),
            calls: AtomicUsize::new(0),
        };
        let cache = BackgroundCache::new();

        cache.get(&source, site(), 600).await.unwrap();
        // base map + 3 overlay attempts
        assert_eq!(source.calls.load(Ordering::SeqCst), 4);

        cache.get(&source, site(), 600).await.unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 4);

        cache.get(&source, site(), 1200).await.unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 8);
    }

    #[tokio::test]
    async fn legend_cache_caches_absence_within_bucket() {
        let source = CountingSource {
            bodies: HashMap::new(),
            calls: AtomicUsize::new(0),
        };
        let cache = LegendCache::new();

        assert!(cache.get(&source, 600).await.is_none());
        assert!(cache.get(&source, 600).await.is_none());
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);

        assert!(cache.get(&source, 1200).await.is_none());
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }
}
