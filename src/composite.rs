use image::{Rgba, RgbaImage, imageops};

use crate::error::{RadarError, RadarResult};

/// Straight-alpha source-over for a single pixel. Inputs and output are
/// non-premultiplied RGBA8.
pub fn over(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    let sa = u32::from(src[3]);
    if sa == 255 {
        return src;
    }
    if sa == 0 {
        return dst;
    }

    let da = u32::from(dst[3]);
    // Destination contribution, scaled by 255 like `sa`.
    let dt = da * (255 - sa);
    let oa255 = sa * 255 + dt;

    let mut out = [0u8; 4];
    for i in 0..3 {
        let c = u32::from(src[i]) * sa * 255 + u32::from(dst[i]) * dt;
        out[i] = ((c + oa255 / 2) / oa255) as u8;
    }
    out[3] = ((oa255 + 127) / 255) as u8;
    out
}

/// Alpha-composite `overlay` onto `base` in place, full resolution. Layers
/// from the imagery host share the base map's dimensions; anything else is a
/// defect, not a skippable condition.
pub fn alpha_over(base: &mut RgbaImage, overlay: &RgbaImage) -> RadarResult<()> {
    if base.dimensions() != overlay.dimensions() {
        let (bw, bh) = base.dimensions();
        let (ow, oh) = overlay.dimensions();
        return Err(RadarError::composite(format!(
            "layer size mismatch: base {bw}x{bh}, overlay {ow}x{oh}"
        )));
    }
    for (d, s) in base.pixels_mut().zip(overlay.pixels()) {
        *d = Rgba(over(d.0, s.0));
    }
    Ok(())
}

/// Opaque paste of `src` onto `canvas` at the origin: pixels are copied,
/// alpha included, with no blending.
pub fn paste(canvas: &mut RgbaImage, src: &RgbaImage) {
    imageops::replace(canvas, src, 0, 0);
}
