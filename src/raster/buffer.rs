use rayon::prelude::*;

use crate::foundation::core::{Rgba8, TRANSPARENT};
use crate::foundation::error::{RasterFxError, RasterFxResult};

/// An owned straight-alpha RGBA8 raster.
///
/// Pixels are tightly packed, row-major, four bytes each. Every constructor enforces
/// `data.len() == width * height * 4` with `width, height > 0`, so engines can index rows and
/// pixels without re-validating.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// A zero-initialised (transparent black) buffer.
    pub fn new(width: u32, height: u32) -> RasterFxResult<Self> {
        let len = byte_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0u8; len],
        })
    }

    /// A buffer where every pixel is `px`.
    pub fn filled(width: u32, height: u32, px: Rgba8) -> RasterFxResult<Self> {
        let len = byte_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: px.repeat(len / 4),
        })
    }

    /// Wrap raw RGBA8 bytes, validating their length against the dimensions.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> RasterFxResult<Self> {
        let len = byte_len(width, height)?;
        if data.len() != len {
            return Err(RasterFxError::validation(format!(
                "expected {len} bytes for {width}x{height} rgba8, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a buffer by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(
        width: u32,
        height: u32,
        mut f: impl FnMut(u32, u32) -> Rgba8,
    ) -> RasterFxResult<Self> {
        let mut out = Self::new(width, height)?;
        for y in 0..height {
            for x in 0..width {
                out.put(x, y, f(x, y));
            }
        }
        Ok(out)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Checked read.
    pub fn get(&self, x: u32, y: u32) -> RasterFxResult<Rgba8> {
        self.check(x, y)?;
        Ok(self.at(x, y))
    }

    /// Checked write.
    pub fn set(&mut self, x: u32, y: u32, px: Rgba8) -> RasterFxResult<()> {
        self.check(x, y)?;
        self.put(x, y, px);
        Ok(())
    }

    /// A fully independent buffer with identical dimensions and contents.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// A transparent buffer with the same dimensions.
    pub fn blank_like(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            data: vec![0u8; self.data.len()],
        }
    }

    pub fn pixels(&self) -> impl Iterator<Item = Rgba8> + '_ {
        self.data.chunks_exact(4).map(|p| [p[0], p[1], p[2], p[3]])
    }

    pub(crate) fn stride(&self) -> usize {
        self.width as usize * 4
    }

    /// Unchecked read for coordinates the caller has already bounds-tested.
    pub(crate) fn at(&self, x: u32, y: u32) -> Rgba8 {
        let i = self.index(x, y);
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Read with signed coordinates, `None` when outside the raster.
    pub(crate) fn sample(&self, x: i64, y: i64) -> Option<Rgba8> {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return None;
        }
        Some(self.at(x as u32, y as u32))
    }

    pub(crate) fn put(&mut self, x: u32, y: u32, px: Rgba8) {
        let i = self.index(x, y);
        self.data[i..i + 4].copy_from_slice(&px);
    }

    /// Rebuild every pixel from its own value, in parallel over rows.
    pub(crate) fn map_pixels(&self, f: impl Fn(Rgba8) -> Rgba8 + Sync) -> Self {
        self.map_rows(|_, src_row, dst_row| {
            for (d, s) in dst_row.chunks_exact_mut(4).zip(src_row.chunks_exact(4)) {
                d.copy_from_slice(&f([s[0], s[1], s[2], s[3]]));
            }
        })
    }

    /// Fill a fresh output buffer row by row in parallel.
    ///
    /// `f(y, src_row, dst_row)` sees the read-only source row `y` and the private output row `y`;
    /// the output starts transparent.
    pub(crate) fn map_rows(&self, f: impl Fn(u32, &[u8], &mut [u8]) + Sync) -> Self {
        let stride = self.stride();
        let mut out = self.blank_like();
        out.data
            .par_chunks_mut(stride)
            .zip(self.data.par_chunks(stride))
            .enumerate()
            .for_each(|(y, (dst_row, src_row))| f(y as u32, src_row, dst_row));
        out
    }

    /// Gather transform: every output pixel takes `f(x, y)`, evaluated in parallel over rows.
    pub(crate) fn gather(&self, f: impl Fn(u32, u32) -> Rgba8 + Sync) -> Self {
        self.map_rows(|y, _, dst_row| {
            for (x, d) in dst_row.chunks_exact_mut(4).enumerate() {
                d.copy_from_slice(&f(x as u32, y));
            }
        })
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    fn check(&self, x: u32, y: u32) -> RasterFxResult<()> {
        if x >= self.width || y >= self.height {
            return Err(RasterFxError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

impl Default for PixelBuffer {
    /// A single transparent pixel.
    fn default() -> Self {
        Self {
            width: 1,
            height: 1,
            data: TRANSPARENT.to_vec(),
        }
    }
}

fn byte_len(width: u32, height: u32) -> RasterFxResult<usize> {
    if width == 0 || height == 0 {
        return Err(RasterFxError::validation(format!(
            "image dimensions must be positive, got {width}x{height}"
        )));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| RasterFxError::validation("image buffer size overflow"))
}

#[cfg(test)]
#[path = "../../tests/unit/raster/buffer.rs"]
mod tests;
