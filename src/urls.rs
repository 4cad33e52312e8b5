//! Upstream URL templates. These must be reproduced byte-for-byte for
//! compatibility with the imagery host; see the tests below.

pub const BASE_URL: &str = "http://www.bom.gov.au";

/// Static overlays merged onto the base map, in compositing order.
pub const OVERLAY_LAYERS: [&str; 3] = ["topography", "locations", "range"];

pub fn background_url(radar_id: &str) -> String {
    format!("{BASE_URL}/products/radar_transparencies/IDR{radar_id}.background.png")
}

pub fn overlay_url(radar_id: &str, layer: &str) -> String {
    format!("{BASE_URL}/products/radar_transparencies/IDR{radar_id}.{layer}.png")
}

pub fn legend_url() -> String {
    format!("{BASE_URL}/products/radar_transparencies/IDR.legend.0.png")
}

pub fn snapshot_url(radar_id: &str, time_str: &str) -> String {
    format!("{BASE_URL}/radar/IDR{radar_id}.T.{time_str}.png")
}
