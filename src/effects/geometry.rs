//! Pixel remapping transforms.
//!
//! Apart from [`vhs`], every transform here is an inverse mapping: each output pixel computes the
//! source coordinate it samples. Output pixels whose source lies outside the raster stay
//! transparent. All of them read from the immutable input and write a fresh buffer.

use image::imageops::{self, FilterType};
use kurbo::{Affine, Point, Vec2};

use crate::foundation::core::{Rgba8, TRANSPARENT};
use crate::foundation::error::{RasterFxError, RasterFxResult};
use crate::raster::buffer::PixelBuffer;

/// Viewer distance used by [`spin_cube`]'s perspective divide.
pub const SPIN_DEPTH: f64 = 400.0;

/// Extra polar angle per pixel of radius applied by [`swirl`].
pub const SWIRL_TWIST: f64 = 0.0005;

/// Row phase step for [`vhs`].
pub const VHS_ROW_FREQ: f64 = 0.1;

pub const HEATWAVE_STRENGTH: i32 = 8;
pub const WARP_STRENGTH: i32 = 10;

/// Rotate by `angle` radians about the image centre with bilinear sampling.
///
/// The output keeps the input's dimensions; corners that rotate in from outside the raster are
/// transparent.
pub fn rotate(img: &PixelBuffer, angle: f64) -> PixelBuffer {
    let (w, h) = img.dimensions();
    let (wf, hf) = (f64::from(w), f64::from(h));
    let centre = Vec2::new(wf / 2.0, hf / 2.0);
    let dst_to_src =
        Affine::translate(centre) * Affine::rotate(-angle) * Affine::translate(-centre);

    img.gather(|x, y| {
        let p = dst_to_src * Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
        if !(0.0..wf).contains(&p.x) || !(0.0..hf).contains(&p.y) {
            return TRANSPARENT;
        }
        sample_bilinear(img, p.x - 0.5, p.y - 0.5)
    })
}

/// Fake 3D turn of a flat card about the vertical axis.
///
/// Each column is foreshortened by `depth / (depth + sin(angle) * dx)`. This is a cheap
/// perspective approximation, not a physically accurate 3D rotation: rows are scaled by the same
/// factor as columns and nothing is hidden when the card faces away.
pub fn spin_cube(img: &PixelBuffer, angle: f64) -> PixelBuffer {
    let (w, h) = img.dimensions();
    let cx = f64::from(w) / 2.0;
    let cy = f64::from(h) / 2.0;
    let (sin, cos) = angle.sin_cos();

    img.gather(|x, y| {
        let dx = f64::from(x) - cx;
        let dy = f64::from(y) - cy;
        let dz = sin * dx;
        let px = cos * dx;
        let scale = SPIN_DEPTH / (SPIN_DEPTH + dz);
        if !scale.is_finite() {
            return TRANSPARENT;
        }
        let sx = (cx + px * scale) as i64;
        let sy = (cy + dy * scale) as i64;
        img.sample(sx, sy).unwrap_or(TRANSPARENT)
    })
}

/// Polar twist whose strength grows with distance from the centre. The centre pixel is fixed.
pub fn swirl(img: &PixelBuffer) -> PixelBuffer {
    let (w, h) = img.dimensions();
    let cx = i64::from(w / 2);
    let cy = i64::from(h / 2);

    img.gather(|x, y| {
        let dx = i64::from(x) - cx;
        let dy = i64::from(y) - cy;
        let (dxf, dyf) = (dx as f64, dy as f64);
        let dist = (dxf * dxf + dyf * dyf).sqrt();
        let angle = dyf.atan2(dxf) + dist * SWIRL_TWIST;
        let (sin, cos) = angle.sin_cos();
        let sx = (cx as f64 + dist * cos) as i64;
        let sy = (cy as f64 + dist * sin) as i64;
        img.sample(sx, sy).unwrap_or(TRANSPARENT)
    })
}

/// Halve the colour of every even row.
pub fn scanlines(img: &PixelBuffer) -> PixelBuffer {
    img.map_rows(|y, src_row, dst_row| {
        dst_row.copy_from_slice(src_row);
        if y % 2 != 0 {
            return;
        }
        for px in dst_row.chunks_exact_mut(4) {
            px[0] /= 2;
            px[1] /= 2;
            px[2] /= 2;
        }
    })
}

/// Horizontal row shift following a sine over `y`, wrapping at the right edge.
///
/// This is a forward scatter: source pixel `(x, y)` is written to `((x + shift) mod width, y)`.
/// When several sources land on one destination the rightmost source wins, and destinations
/// nothing lands on keep their transparent initial value.
pub fn vhs(img: &PixelBuffer, strength: i32) -> PixelBuffer {
    let w = i64::from(img.width());
    img.map_rows(|y, src_row, dst_row| {
        let shift = ((f64::from(y) * VHS_ROW_FREQ).sin() * f64::from(strength)).round() as i64;
        for (x, src) in src_row.chunks_exact(4).enumerate() {
            let nx = (x as i64 + shift).rem_euclid(w) as usize * 4;
            dst_row[nx..nx + 4].copy_from_slice(src);
        }
    })
}

pub fn heatwave(img: &PixelBuffer) -> PixelBuffer {
    vhs(img, HEATWAVE_STRENGTH)
}

pub fn warp(img: &PixelBuffer) -> PixelBuffer {
    vhs(img, WARP_STRENGTH)
}

/// Fill each `size x size` block with its top-left pixel. Blocks on the right and bottom edges
/// are clipped.
pub fn pixelate(img: &PixelBuffer, size: u32) -> PixelBuffer {
    let size = size.max(1);
    img.gather(|x, y| img.at(x - x % size, y - y % size))
}

/// Smooth 2x horizontal upscale followed by a downscale back to the original width.
///
/// The round trip leaves the geometry unchanged and softens horizontal detail.
pub fn stretch(img: &PixelBuffer) -> RasterFxResult<PixelBuffer> {
    let (w, h) = img.dimensions();
    let wide_w = w
        .checked_mul(2)
        .ok_or_else(|| RasterFxError::validation("stretch width overflow"))?;
    let rgba = image::RgbaImage::from_raw(w, h, img.as_raw().to_vec())
        .ok_or_else(|| RasterFxError::validation("stretch expects a w*h*4 rgba8 buffer"))?;

    let wide = imageops::resize(&rgba, wide_w, h, FilterType::CatmullRom);
    let back = imageops::resize(&wide, w, h, FilterType::Triangle);
    PixelBuffer::from_rgba8(w, h, back.into_raw())
}

/// Bilinear sample at fractional pixel coordinates, neighbours clamped to the raster edge.
fn sample_bilinear(img: &PixelBuffer, fx: f64, fy: f64) -> Rgba8 {
    let max_x = i64::from(img.width()) - 1;
    let max_y = i64::from(img.height()) - 1;
    let x0 = fx.floor() as i64;
    let y0 = fy.floor() as i64;
    let tx = fx - x0 as f64;
    let ty = fy - y0 as f64;

    let fetch = |x: i64, y: i64| img.at(x.clamp(0, max_x) as u32, y.clamp(0, max_y) as u32);
    let p00 = fetch(x0, y0);
    let p10 = fetch(x0 + 1, y0);
    let p01 = fetch(x0, y0 + 1);
    let p11 = fetch(x0 + 1, y0 + 1);

    let mut out = [0u8; 4];
    for c in 0..4 {
        let v = f64::from(p00[c]) * (1.0 - tx) * (1.0 - ty)
            + f64::from(p10[c]) * tx * (1.0 - ty)
            + f64::from(p01[c]) * (1.0 - tx) * ty
            + f64::from(p11[c]) * tx * ty;
        out[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/effects/geometry.rs"]
mod tests;
