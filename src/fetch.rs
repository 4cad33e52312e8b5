use std::time::Duration;

use anyhow::Context as _;
use async_trait::async_trait;
use image::RgbaImage;
use tracing::debug;

use crate::error::RadarResult;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Transport seam: fetch the raw bytes at a URL, or report them unavailable.
///
/// Unavailability is a value, not an error. Exactly one attempt is made per
/// call; retry policy, if any, belongs to the bucket cadence (a failed image
/// is simply fetched again in the next refresh window).
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn fetch_bytes(&self, url: &str) -> Option<Vec<u8>>;
}

/// `ImageSource` over plain HTTP. The request timeout is the only bound the
/// pipeline places on a hung fetch.
pub struct HttpImageSource {
    client: reqwest::Client,
}

impl HttpImageSource {
    pub fn new() -> RadarResult<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> RadarResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("build http client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ImageSource for HttpImageSource {
    async fn fetch_bytes(&self, url: &str) -> Option<Vec<u8>> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(error) => {
                debug!(url, %error, "request failed");
                return None;
            }
        };
        if !response.status().is_success() {
            debug!(url, status = %response.status(), "non-success status");
            return None;
        }
        match response.bytes().await {
            Ok(bytes) => Some(bytes.to_vec()),
            Err(error) => {
                debug!(url, %error, "body read failed");
                None
            }
        }
    }
}

/// Fetch and decode one remote image to RGBA8. A malformed body is treated
/// the same as a failed fetch.
pub async fn fetch_image(source: &dyn ImageSource, url: &str) -> Option<RgbaImage> {
    debug!(url, "fetching image");
    let bytes = source.fetch_bytes(url).await?;
    match image::load_from_memory(&bytes) {
        Ok(img) => Some(img.to_rgba8()),
        Err(error) => {
            debug!(url, %error, "image decode failed");
            None
        }
    }
}
