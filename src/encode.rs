use std::io::Cursor;

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, Rgba, RgbaImage};

use crate::error::{RadarError, RadarResult};

/// Display time per frame in the finished loop.
pub const FRAME_DELAY_MS: u32 = 500;

/// Dimensions of the blank frame substituted when no loop can be built.
pub const PLACEHOLDER_WIDTH: u32 = 340;
pub const PLACEHOLDER_HEIGHT: u32 = 370;

/// Encode an ordered frame sequence as an infinitely looping GIF.
pub fn encode_loop(frames: Vec<RgbaImage>) -> RadarResult<Vec<u8>> {
    if frames.is_empty() {
        return Err(RadarError::validation(
            "cannot encode an empty frame sequence",
        ));
    }

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = GifEncoder::new(&mut buf);
        encoder
            .set_repeat(Repeat::Infinite)
            .map_err(|e| RadarError::encode(format!("set gif repeat: {e}")))?;
        for image in frames {
            let frame =
                Frame::from_parts(image, 0, 0, Delay::from_numer_denom_ms(FRAME_DELAY_MS, 1));
            encoder
                .encode_frame(frame)
                .map_err(|e| RadarError::encode(format!("encode gif frame: {e}")))?;
        }
    }
    Ok(buf.into_inner())
}

/// A well-formed single-frame blank GIF. Served whenever a real loop cannot
/// be produced, so consumers always receive displayable bytes.
pub fn placeholder() -> RadarResult<Vec<u8>> {
    let blank = RgbaImage::from_pixel(PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT, Rgba([0, 0, 0, 255]));
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = GifEncoder::new(&mut buf);
        encoder
            .encode_frame(Frame::new(blank))
            .map_err(|e| RadarError::encode(format!("encode placeholder frame: {e}")))?;
    }
    Ok(buf.into_inner())
}
