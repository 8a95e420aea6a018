//! rasterfx applies ordered lists of visual effects to RGBA8 rasters.
//!
//! - Decode bytes with [`codec::decode_image`] (or build a [`PixelBuffer`] directly)
//! - Parse a wire effect list into [`EffectSpec`]s
//! - Run them through an [`EffectPipeline`] and encode the result
#![forbid(unsafe_code)]

mod foundation;
mod raster;

pub mod codec;
pub mod effects;
pub mod model;
pub mod pipeline;

pub use crate::foundation::core::{Rgba8, Rgba8Premul, TRANSPARENT, clamp};
pub use crate::foundation::error::{RasterFxError, RasterFxResult};
pub use crate::model::{EffectKind, EffectSpec, parse_effect};
pub use crate::pipeline::{
    EffectPipeline, PipelineOpts, UnknownEffectPolicy, apply, apply_one, parse_effect_list,
};
pub use crate::raster::buffer::PixelBuffer;
