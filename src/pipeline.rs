use std::sync::{Arc, LazyLock};

use tracing::{debug, info, warn};

use crate::cache::BucketCache;
use crate::encode;
use crate::error::RadarResult;
use crate::fetch::ImageSource;
use crate::frames;
use crate::layers::{BackgroundCache, LegendCache};
use crate::registry::Site;
use crate::timing;

// Built once; the input is a fixed-size solid image, so encoding it cannot
// fail on any valid build of the crate.
static PLACEHOLDER: LazyLock<Vec<u8>> =
    LazyLock::new(|| encode::placeholder().expect("placeholder gif encodes"));

/// Builds and caches the animated loop for one radar site.
///
/// `get_loop` never fails and never returns empty bytes: any window in which
/// a real loop cannot be produced yields the fixed blank placeholder
/// instead. Within one refresh window the encoded bytes are computed once
/// and served to every caller.
pub struct RadarLoop {
    site: &'static Site,
    source: Arc<dyn ImageSource>,
    background: BackgroundCache,
    legend: LegendCache,
    encoded: BucketCache<Arc<Vec<u8>>>,
}

impl RadarLoop {
    pub fn new(site: &'static Site, source: Arc<dyn ImageSource>) -> Self {
        Self::with_legend_cache(site, source, LegendCache::new())
    }

    /// Use a legend cache shared with other sites. The legend is a single
    /// upstream asset, so one fetch per bucket can serve every site.
    pub fn with_legend_cache(
        site: &'static Site,
        source: Arc<dyn ImageSource>,
        legend: LegendCache,
    ) -> Self {
        Self {
            site,
            source,
            background: BackgroundCache::new(),
            legend,
            encoded: BucketCache::new(),
        }
    }

    pub fn site(&self) -> &'static Site {
        self.site
    }

    /// Loop bytes for the current refresh window.
    pub async fn get_loop(&self) -> Vec<u8> {
        self.get_loop_at(timing::current_bucket(self.site.delta))
            .await
    }

    /// Loop bytes for an explicit bucket. Repeated calls within one bucket
    /// return the cached bytes without touching the network; a new bucket
    /// evicts the previous loop and rebuilds.
    pub async fn get_loop_at(&self, bucket: i64) -> Vec<u8> {
        let bytes = self
            .encoded
            .get_or_insert_with(bucket, async {
                match self.build(bucket).await {
                    Ok(Some(bytes)) => {
                        info!(
                            site = self.site.name,
                            bucket,
                            len = bytes.len(),
                            "built radar loop"
                        );
                        Arc::new(bytes)
                    }
                    Ok(None) => {
                        debug!(
                            site = self.site.name,
                            bucket, "no frames this window, serving placeholder"
                        );
                        Arc::new(PLACEHOLDER.clone())
                    }
                    Err(error) => {
                        warn!(
                            site = self.site.name,
                            bucket, %error, "loop build failed, serving placeholder"
                        );
                        Arc::new(PLACEHOLDER.clone())
                    }
                }
            })
            .await;
        bytes.as_ref().clone()
    }

    /// `Ok(None)` is the expected no-data outcome; `Err` is an internal
    /// defect. Both degrade to the placeholder above, but they are logged
    /// at different levels so defects stay visible.
    async fn build(&self, bucket: i64) -> RadarResult<Option<Vec<u8>>> {
        let frames = frames::assemble(
            self.source.as_ref(),
            self.site,
            bucket,
            &self.background,
            &self.legend,
        )
        .await?;
        if frames.is_empty() {
            return Ok(None);
        }
        encode::encode_loop(frames).map(Some)
    }
}
