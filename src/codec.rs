//! Byte-level boundary: image decoding/encoding and the two request shapes the effect endpoints
//! accept.
//!
//! - *Framed* requests carry a 4-byte big-endian JSON length, the JSON config
//!   `{"effects":[...]}`, then the encoded image.
//! - *Header* requests carry the image as the whole body and select one effect through a
//!   manipulation type plus an optional angle in degrees.

use std::io::Cursor;

use anyhow::Context as _;

use crate::foundation::error::{RasterFxError, RasterFxResult};
use crate::model::{EffectKind, EffectSpec};
use crate::pipeline::EffectPipeline;
use crate::raster::buffer::PixelBuffer;

/// Decode any format the `image` crate understands into straight-alpha RGBA8.
pub fn decode_image(bytes: &[u8]) -> RasterFxResult<PixelBuffer> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| RasterFxError::decode(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(RasterFxError::decode(format!(
            "decoded image has empty dimensions {width}x{height}"
        )));
    }
    PixelBuffer::from_rgba8(width, height, rgba.into_raw())
}

/// Encode as PNG.
pub fn encode_png(img: &PixelBuffer) -> RasterFxResult<Vec<u8>> {
    let (w, h) = img.dimensions();
    let rgba = image::RgbaImage::from_raw(w, h, img.as_raw().to_vec())
        .ok_or_else(|| RasterFxError::encode("pixel buffer does not match its dimensions"))?;
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(rgba)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| RasterFxError::encode(format!("encode png: {e}")))?;
    Ok(buf)
}

/// A length-prefixed JSON config followed by image bytes.
#[derive(Clone, Debug)]
pub struct FramedRequest<'a> {
    /// The `effects` array, unparsed.
    pub effects: serde_json::Value,
    pub image_bytes: &'a [u8],
}

impl<'a> FramedRequest<'a> {
    pub fn parse(body: &'a [u8]) -> RasterFxResult<Self> {
        let Some((len_bytes, rest)) = body.split_first_chunk::<4>() else {
            return Err(RasterFxError::decode(
                "request body is shorter than its 4-byte length prefix",
            ));
        };
        let json_len = u32::from_be_bytes(*len_bytes) as usize;
        if json_len > rest.len() {
            return Err(RasterFxError::decode(format!(
                "request declares {json_len} bytes of JSON but only {} follow",
                rest.len()
            )));
        }
        let (json_bytes, image_bytes) = rest.split_at(json_len);

        let mut config: serde_json::Value = serde_json::from_slice(json_bytes)
            .map_err(|e| RasterFxError::serde(format!("parse request JSON: {e}")))?;
        let effects = match config.get_mut("effects") {
            Some(v) if v.is_array() => v.take(),
            Some(_) => {
                return Err(RasterFxError::validation(
                    "request 'effects' must be an array",
                ));
            }
            None => return Err(RasterFxError::validation("request is missing 'effects'")),
        };

        Ok(Self {
            effects,
            image_bytes,
        })
    }

    /// Build the wire body for `effects` and already-encoded `image_bytes`.
    pub fn encode(effects: &[EffectSpec], image_bytes: &[u8]) -> RasterFxResult<Vec<u8>> {
        let json = serde_json::to_vec(&serde_json::json!({ "effects": effects }))
            .map_err(|e| RasterFxError::serde(format!("serialize request JSON: {e}")))?;
        let len = u32::try_from(json.len())
            .map_err(|_| RasterFxError::validation("request JSON is too large"))?;

        let mut body = Vec::with_capacity(4 + json.len() + image_bytes.len());
        body.extend_from_slice(&len.to_be_bytes());
        body.extend_from_slice(&json);
        body.extend_from_slice(image_bytes);
        Ok(body)
    }
}

/// A single-effect request selected by manipulation type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeaderRequest {
    pub kind: EffectKind,
    pub angle_deg: f64,
}

impl HeaderRequest {
    /// Manipulations the header endpoint exposes.
    pub const SUPPORTED: [EffectKind; 3] = [
        EffectKind::SpinCube,
        EffectKind::Rotate,
        EffectKind::Grayscale,
    ];

    /// Build from raw header values. Unlike the JSON list, an unknown manipulation type is an
    /// error here.
    pub fn from_headers(manip_type: Option<&str>, angle: Option<&str>) -> RasterFxResult<Self> {
        let Some(manip_type) = manip_type else {
            return Err(RasterFxError::validation("missing manipulation type"));
        };
        let kind = EffectKind::from_name(manip_type)
            .filter(|k| Self::SUPPORTED.contains(k))
            .ok_or_else(|| RasterFxError::unsupported(manip_type))?;

        let angle_deg = match angle {
            None => 0.0,
            Some(raw) => {
                let v: f64 = raw.trim().parse().map_err(|_| {
                    RasterFxError::validation(format!("angle '{raw}' is not a number"))
                })?;
                if !v.is_finite() {
                    return Err(RasterFxError::validation("angle must be finite"));
                }
                v
            }
        };

        Ok(Self { kind, angle_deg })
    }

    pub fn to_effect(self) -> EffectSpec {
        let angle = self.angle_deg.to_radians();
        match self.kind {
            EffectKind::SpinCube => EffectSpec::SpinCube { angle },
            EffectKind::Rotate => EffectSpec::Rotate { angle },
            other => EffectSpec::with_defaults(other),
        }
    }
}

/// Handle a framed request body end to end, returning PNG bytes.
///
/// `pipeline` is shared across requests; it owns the worker pool, so build it once per process.
#[tracing::instrument(skip_all, fields(body_len = body.len()))]
pub fn process_framed(pipeline: &EffectPipeline, body: &[u8]) -> RasterFxResult<Vec<u8>> {
    let req = FramedRequest::parse(body)?;
    let specs = pipeline.parse(&req.effects)?;
    let img = decode_image(req.image_bytes)?;
    let out = pipeline.run(img, &specs)?;
    encode_png(&out)
}

/// Handle a header-selected request end to end, returning PNG bytes.
#[tracing::instrument(skip(pipeline, body), fields(body_len = body.len()))]
pub fn process_header(
    pipeline: &EffectPipeline,
    req: HeaderRequest,
    body: &[u8],
) -> RasterFxResult<Vec<u8>> {
    let img = decode_image(body)?;
    let out = pipeline.run(img, &[req.to_effect()])?;
    encode_png(&out)
}

/// Read an image file from disk.
pub fn read_image(path: &std::path::Path) -> RasterFxResult<PixelBuffer> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    decode_image(&bytes)
}

#[cfg(test)]
#[path = "../tests/unit/codec.rs"]
mod tests;
