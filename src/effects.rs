//! Effect engines. Every function reads an immutable [`PixelBuffer`](crate::PixelBuffer) and
//! returns a freshly allocated one of the same dimensions.

pub mod color;
pub mod composite;
pub mod convolve;
pub mod geometry;
