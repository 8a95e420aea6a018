use crate::foundation::core::{Rgba8, Rgba8Premul};
use crate::foundation::math::{mul_div255_u8, opacity_to_u8};
use crate::raster::buffer::PixelBuffer;

pub type PremulRgba8 = [u8; 4];

/// Offset of the translucent copy drawn by [`ghost`].
pub const GHOST_OFFSET: (u32, u32) = (10, 10);
pub const GHOST_OPACITY: f32 = 0.5;

pub const GLOW_COLOR: Rgba8 = [255, 255, 255, 255];
pub const GLOW_OPACITY: f32 = 0.3;

/// Source-over for premultiplied pixels with an extra global `opacity`.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let op = u16::from(opacity_to_u8(opacity));
    if op == 0 || src[3] == 0 {
        return dst;
    }

    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Source-over for straight-alpha pixels, going through premultiplied space.
pub fn over_straight(dst: Rgba8, src: Rgba8, opacity: f32) -> Rgba8 {
    let d = Rgba8Premul::from_straight(dst).to_array();
    let s = Rgba8Premul::from_straight(src).to_array();
    Rgba8Premul::from_array(over(d, s, opacity)).to_straight()
}

/// The image composited over itself at half opacity, shifted down and right by
/// [`GHOST_OFFSET`]. Pixels the shifted copy does not cover are unchanged.
pub fn ghost(img: &PixelBuffer) -> PixelBuffer {
    let (ox, oy) = GHOST_OFFSET;
    img.gather(|x, y| {
        let base = img.at(x, y);
        if x < ox || y < oy {
            return base;
        }
        over_straight(base, img.at(x - ox, y - oy), GHOST_OPACITY)
    })
}

/// A white wash over the whole image at [`GLOW_OPACITY`].
pub fn glow(img: &PixelBuffer) -> PixelBuffer {
    img.map_pixels(|px| over_straight(px, GLOW_COLOR, GLOW_OPACITY))
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
