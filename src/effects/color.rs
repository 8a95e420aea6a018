//! Per-pixel colour maps. Alpha is carried through unchanged by every map.

use rand::Rng;

use crate::foundation::core::{Rgba8, clamp};
use crate::raster::buffer::PixelBuffer;

/// Half-open range each noise offset is drawn from.
pub const NOISE_RANGE: std::ops::Range<i32> = -25..25;

pub fn invert(img: &PixelBuffer) -> PixelBuffer {
    img.map_pixels(|[r, g, b, a]| [255 - r, 255 - g, 255 - b, a])
}

/// Unweighted channel mean, truncated.
pub fn grayscale(img: &PixelBuffer) -> PixelBuffer {
    img.map_pixels(gray_px)
}

pub(crate) fn gray_px([r, g, b, a]: Rgba8) -> Rgba8 {
    let avg = ((u16::from(r) + u16::from(g) + u16::from(b)) / 3) as u8;
    [avg, avg, avg, a]
}

pub fn sepia(img: &PixelBuffer) -> PixelBuffer {
    img.map_pixels(|[r, g, b, a]| {
        let (r, g, b) = (f64::from(r), f64::from(g), f64::from(b));
        [
            clamp((0.393 * r + 0.769 * g + 0.189 * b) as i32),
            clamp((0.349 * r + 0.686 * g + 0.168 * b) as i32),
            clamp((0.272 * r + 0.534 * g + 0.131 * b) as i32),
            a,
        ]
    })
}

pub fn solarize(img: &PixelBuffer) -> PixelBuffer {
    fn flip(c: u8) -> u8 {
        if c > 128 { 255 - c } else { c }
    }
    img.map_pixels(|[r, g, b, a]| [flip(r), flip(g), flip(b), a])
}

/// Quantise each channel down to a multiple of `256 / levels`.
///
/// `levels` must be in `1..=256`; the effect parser enforces this.
pub fn posterize(img: &PixelBuffer, levels: u32) -> PixelBuffer {
    let step = (256 / levels.clamp(1, 256)) as u16;
    let q = move |c: u8| ((u16::from(c) / step) * step) as u8;
    img.map_pixels(move |[r, g, b, a]| [q(r), q(g), q(b), a])
}

pub fn brightness(img: &PixelBuffer, amount: i32) -> PixelBuffer {
    let shift = move |c: u8| clamp(i32::from(c).saturating_add(amount));
    img.map_pixels(move |[r, g, b, a]| [shift(r), shift(g), shift(b), a])
}

/// Scale each channel's distance from mid-grey (128) by `amount`.
pub fn contrast(img: &PixelBuffer, amount: f64) -> PixelBuffer {
    let stretch = move |c: u8| clamp(((f64::from(c) - 128.0) * amount + 128.0) as i32);
    img.map_pixels(move |[r, g, b, a]| [stretch(r), stretch(g), stretch(b), a])
}

/// Add an independent uniform offset from [`NOISE_RANGE`] to every colour channel.
///
/// Draws happen in row-major pixel order, r then g then b, so a given `rng` state always yields
/// the same output.
pub fn noise<R: Rng + ?Sized>(img: &PixelBuffer, rng: &mut R) -> PixelBuffer {
    let mut out = img.copy();
    for y in 0..img.height() {
        for x in 0..img.width() {
            let [r, g, b, a] = img.at(x, y);
            let mut jitter = |c: u8| clamp(i32::from(c) + rng.gen_range(NOISE_RANGE));
            let px = [jitter(r), jitter(g), jitter(b), a];
            out.put(x, y, px);
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/effects/color.rs"]
mod tests;
