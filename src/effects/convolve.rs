use crate::effects::color;
use crate::foundation::core::clamp;
use crate::raster::buffer::PixelBuffer;

/// A 3x3 convolution kernel, weights in row-major order.
///
/// Pixels whose neighbourhood would leave the raster (the one-pixel frame) are copied through
/// unchanged; there is no wrapping or zero padding.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Kernel {
    pub weights: [f32; 9],
}

impl Kernel {
    pub const fn new(weights: [f32; 9]) -> Self {
        Self { weights }
    }

    pub const BLUR: Self = Self::new([1.0 / 9.0; 9]);

    pub const SHARPEN: Self = Self::new([0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0]);

    pub const EDGE: Self = Self::new([-1.0, -1.0, -1.0, -1.0, 8.0, -1.0, -1.0, -1.0, -1.0]);

    pub const EMBOSS: Self = Self::new([-2.0, -1.0, 0.0, -1.0, 1.0, 1.0, 0.0, 1.0, 2.0]);
}

/// Convolve the colour channels with `kernel`; alpha is passed through.
///
/// This is a true convolution: the kernel is rotated a half turn, so `weights[0]` (top-left)
/// multiplies the bottom-right neighbour.
///
/// Sums are rounded to the nearest integer before saturating, so kernels whose weights sum to one
/// reproduce a uniform field exactly.
pub fn convolve(img: &PixelBuffer, kernel: &Kernel) -> PixelBuffer {
    let (w, h) = img.dimensions();
    if w < 3 || h < 3 {
        return img.copy();
    }

    let stride = img.stride();
    let src = img.as_raw();
    img.map_rows(|y, src_row, dst_row| {
        dst_row.copy_from_slice(src_row);
        if y == 0 || y == h - 1 {
            return;
        }
        let y = y as usize;
        for x in 1..(w as usize - 1) {
            let mut acc = [0.0f32; 3];
            for ky in 0..3 {
                let row = (y + 1 - ky) * stride;
                for kx in 0..3 {
                    let weight = kernel.weights[ky * 3 + kx];
                    let i = row + (x + 1 - kx) * 4;
                    for (c, sum) in acc.iter_mut().enumerate() {
                        *sum += f32::from(src[i + c]) * weight;
                    }
                }
            }
            let o = x * 4;
            for (c, sum) in acc.iter().enumerate() {
                dst_row[o + c] = clamp(sum.round() as i32);
            }
        }
    })
}

pub fn blur(img: &PixelBuffer) -> PixelBuffer {
    convolve(img, &Kernel::BLUR)
}

pub fn sharpen(img: &PixelBuffer) -> PixelBuffer {
    convolve(img, &Kernel::SHARPEN)
}

pub fn edge(img: &PixelBuffer) -> PixelBuffer {
    convolve(img, &Kernel::EDGE)
}

pub fn emboss(img: &PixelBuffer) -> PixelBuffer {
    convolve(img, &Kernel::EMBOSS)
}

/// Edge detection over the greyscale image.
pub fn neon(img: &PixelBuffer) -> PixelBuffer {
    convolve(&color::grayscale(img), &Kernel::EDGE)
}

/// Edge detection over the colour image.
pub fn outline(img: &PixelBuffer) -> PixelBuffer {
    convolve(img, &Kernel::EDGE)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/convolve.rs"]
mod tests;
