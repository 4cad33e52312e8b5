use std::sync::Arc;

use futures::future::join_all;
use image::RgbaImage;
use rayon::prelude::*;
use tracing::debug;

use crate::composite;
use crate::error::{RadarError, RadarResult};
use crate::fetch::{self, ImageSource};
use crate::layers::{BackgroundCache, LegendCache};
use crate::registry::Site;
use crate::{timing, urls};

/// Assemble the ordered frame set for `bucket`.
///
/// Snapshots are fetched concurrently and unavailable ones dropped, so the
/// result is a best-effort set of whatever the upstream had at request time.
/// `Ok(empty)` means no loop can be built for this window (no snapshots, or
/// no background/legend to put them on); that is expected and handled
/// upstream. `Err` means the pipeline itself misbehaved.
///
/// Ordering: frames follow snapshot timestamp order, oldest first,
/// regardless of fetch or composite completion order.
pub async fn assemble(
    source: &dyn ImageSource,
    site: &'static Site,
    bucket: i64,
    background: &BackgroundCache,
    legend: &LegendCache,
) -> RadarResult<Vec<RgbaImage>> {
    let times = timing::time_strings(bucket, site.delta, site.frames)?;
    let fetches = times.iter().map(|t| {
        let url = urls::snapshot_url(site.id, t);
        async move { fetch::fetch_image(source, &url).await }
    });
    // join_all resolves in index order, so dropping absent entries keeps the
    // survivors in timestamp order.
    let snapshots: Vec<RgbaImage> = join_all(fetches).await.into_iter().flatten().collect();
    if snapshots.is_empty() {
        debug!(site = site.name, bucket, "no snapshots available");
        return Ok(Vec::new());
    }

    let Some(background) = background.get(source, site, bucket).await else {
        debug!(site = site.name, bucket, "no background available");
        return Ok(Vec::new());
    };
    let Some(legend) = legend.get(source, bucket).await else {
        debug!(site = site.name, bucket, "no legend available");
        return Ok(Vec::new());
    };

    debug!(
        site = site.name,
        bucket,
        count = snapshots.len(),
        "compositing frames"
    );
    compose_all(snapshots, background, legend).await
}

/// Composite every surviving snapshot into a finished frame on the blocking
/// pool. The rayon fan-out is for throughput only; `collect` keeps index
/// order.
async fn compose_all(
    snapshots: Vec<RgbaImage>,
    background: Arc<RgbaImage>,
    legend: Arc<RgbaImage>,
) -> RadarResult<Vec<RgbaImage>> {
    tokio::task::spawn_blocking(move || {
        snapshots
            .into_par_iter()
            .map(|snapshot| compose_frame(&background, &legend, &snapshot))
            .collect::<RadarResult<Vec<_>>>()
    })
    .await
    .map_err(|e| RadarError::task(format!("frame compositing task failed: {e}")))?
}

/// One finished frame: the snapshot alpha-composited over a fresh copy of
/// the background stack, pasted opaquely at the origin onto a fresh legend
/// canvas. The shared background and legend are never mutated.
fn compose_frame(
    background: &RgbaImage,
    legend: &RgbaImage,
    snapshot: &RgbaImage,
) -> RadarResult<RgbaImage> {
    let mut merged = background.clone();
    composite::alpha_over(&mut merged, snapshot)?;
    let mut canvas = legend.clone();
    composite::paste(&mut canvas, &merged);
    Ok(canvas)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Cursor;
    use std::time::Duration;

    use async_trait::async_trait;
    use image::Rgba;

    use super::*;
    use crate::registry;

    struct DelayedSource {
        bodies: HashMap<String, Vec<u8>>,
        delays: HashMap<String, Duration>,
    }

    #[async_trait]
    impl ImageSource for DelayedSource {
        async fn fetch_bytes(&self, url: &str) -> Option<Vec<u8>> {
            if let Some(delay) = self.delays.get(url) {
                tokio::time::sleep(*delay).await;
            }
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

    const BUCKET: i64 = 1_699_999_800;

    fn layer_bodies() -> HashMap<String, Vec<u8>> {
        HashMap::from([
            // Transparent base so each frame's pixels come straight from the
            // snapshot that produced it.
            (urls::background_url(site().id), png([0, 0, 0, 0])),
            (urls::legend_url(), png([255, 255, 255, 255])),
        ])
    }

    #[tokio::test]
    async fn frames_follow_timestamp_order_not_completion_order() {
        let times = timing::time_strings(BUCKET, site().delta, site().frames).unwrap();
        let colors: [[u8; 4]; 4] = [
            [255, 0, 0, 255],
            [0, 255, 0, 255],
            [0, 0, 255, 255],
            [255, 255, 0, 255],
        ];

        let mut bodies = layer_bodies();
        for (t, color) in times.iter().zip(colors) {
            bodies.insert(urls::snapshot_url(site().id, t), png(color));
        }
        // The second-oldest snapshot resolves last.
        let delays = HashMap::from([(
            urls::snapshot_url(site().id, &times[1]),
            Duration::from_millis(50),
        )]);
        let source = DelayedSource { bodies, delays };

        let frames = assemble(
            &source,
            site(),
            BUCKET,
            &BackgroundCache::new(),
            &LegendCache::new(),
        )
        .await
        .unwrap();

        assert_eq!(frames.len(), 4);
        for (frame, color) in frames.iter().zip(colors) {
            assert_eq!(frame.get_pixel(0, 0).0, color);
        }
    }

    #[tokio::test]
    async fn absent_snapshots_are_dropped_in_place() {
        let times = timing::time_strings(BUCKET, site().delta, site().frames).unwrap();
        let mut bodies = layer_bodies();
        // Only the oldest and newest snapshots exist.
        bodies.insert(urls::snapshot_url(site().id, &times[0]), png([9, 0, 0, 255]));
        bodies.insert(urls::snapshot_url(site().id, &times[3]), png([0, 9, 0, 255]));
        let source = DelayedSource {
            bodies,
            delays: HashMap::new(),
        };

        let frames = assemble(
            &source,
            site(),
            BUCKET,
            &BackgroundCache::new(),
            &LegendCache::new(),
        )
        .await
        .unwrap();

        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].get_pixel(0, 0).0, [9, 0, 0, 255]);
        assert_eq!(frames[1].get_pixel(0, 0).0, [0, 9, 0, 255]);
    }

    #[tokio::test]
    async fn zero_survivors_is_empty_not_error() {
        let source = DelayedSource {
            bodies: layer_bodies(),
            delays: HashMap::new(),
        };
        let frames = assemble(
            &source,
            site(),
            BUCKET,
            &BackgroundCache::new(),
            &LegendCache::new(),
        )
        .await
        .unwrap();
        assert!(frames.is_empty());
    }

    #[tokio::test]
    async fn snapshot_size_mismatch_is_an_error() {
        let times = timing::time_strings(BUCKET, site().delta, site().frames).unwrap();
        let mut bodies = layer_bodies();
        let odd = RgbaImage::from_pixel(8, 8, Rgba([1, 1, 1, 255]));
        let mut buf = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(odd)
            .write_to(&mut buf, image::ImageFormat::Png)
            .unwrap();
        bodies.insert(urls::snapshot_url(site().id, &times[0]), buf.into_inner());
        let source = DelayedSource {
            bodies,
            delays: HashMap::new(),
        };

        let err = assemble(
            &source,
            site(),
            BUCKET,
            &BackgroundCache::new(),
            &LegendCache::new(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RadarError::Composite(_)));
    }
}
