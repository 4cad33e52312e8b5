#![forbid(unsafe_code)]

pub mod cache;
pub mod composite;
pub mod encode;
pub mod error;
pub mod fetch;
pub mod frames;
pub mod layers;
pub mod pipeline;
pub mod registry;
pub mod timing;
pub mod urls;

pub use error::{RadarError, RadarResult};
pub use fetch::{HttpImageSource, ImageSource};
pub use layers::LegendCache;
pub use pipeline::RadarLoop;
pub use registry::{SITES, Site, lookup};
