use crate::foundation::error::{RasterFxError, RasterFxResult};

/// The closed set of effect names accepted on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectKind {
    Invert,
    Grayscale,
    Sepia,
    Solarize,
    Posterize,
    Brightness,
    Contrast,
    Blur,
    Sharpen,
    Edge,
    Emboss,
    Neon,
    Scanlines,
    Vhs,
    Noise,
    Pixelate,
    Stretch,
    Swirl,
    Heatwave,
    Ghost,
    Outline,
    Glow,
    Warp,
    Rotate,
    SpinCube,
}

impl EffectKind {
    pub const ALL: [EffectKind; 25] = [
        Self::Invert,
        Self::Grayscale,
        Self::Sepia,
        Self::Solarize,
        Self::Posterize,
        Self::Brightness,
        Self::Contrast,
        Self::Blur,
        Self::Sharpen,
        Self::Edge,
        Self::Emboss,
        Self::Neon,
        Self::Scanlines,
        Self::Vhs,
        Self::Noise,
        Self::Pixelate,
        Self::Stretch,
        Self::Swirl,
        Self::Heatwave,
        Self::Ghost,
        Self::Outline,
        Self::Glow,
        Self::Warp,
        Self::Rotate,
        Self::SpinCube,
    ];

    /// Canonical wire name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Invert => "invert",
            Self::Grayscale => "grayscale",
            Self::Sepia => "sepia",
            Self::Solarize => "solarize",
            Self::Posterize => "posterize",
            Self::Brightness => "brightness",
            Self::Contrast => "contrast",
            Self::Blur => "blur",
            Self::Sharpen => "sharpen",
            Self::Edge => "edge",
            Self::Emboss => "emboss",
            Self::Neon => "neon",
            Self::Scanlines => "scanlines",
            Self::Vhs => "vhs",
            Self::Noise => "noise",
            Self::Pixelate => "pixelate",
            Self::Stretch => "stretch",
            Self::Swirl => "swirl",
            Self::Heatwave => "heatwave",
            Self::Ghost => "ghost",
            Self::Outline => "outline",
            Self::Glow => "glow",
            Self::Warp => "warp",
            Self::Rotate => "rotate",
            Self::SpinCube => "spin_cube",
        }
    }

    /// Resolve a wire name. Matching is exact: `"Invert"` and `"spin-cube"` are unknown.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }
}

impl std::fmt::Display for EffectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for EffectKind {
    type Err = RasterFxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| RasterFxError::unsupported(s))
    }
}

/// One resolved step of a pipeline: an effect plus its parameters.
///
/// Serializes to the wire shape, e.g. `{"type":"posterize","levels":4}`.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EffectSpec {
    Invert,
    Grayscale,
    Sepia,
    Solarize,
    Posterize { levels: u32 },
    Brightness { amount: i32 },
    Contrast { amount: f64 },
    Blur,
    Sharpen,
    Edge,
    Emboss,
    Neon,
    Scanlines,
    Vhs { strength: i32 },
    Noise,
    Pixelate { size: u32 },
    Stretch,
    Swirl,
    Heatwave,
    Ghost,
    Outline,
    Glow,
    Warp,
    /// `angle` in radians.
    Rotate { angle: f64 },
    /// `angle` in radians.
    SpinCube { angle: f64 },
}

pub const DEFAULT_POSTERIZE_LEVELS: u32 = 4;
pub const DEFAULT_BRIGHTNESS_AMOUNT: i32 = 40;
pub const DEFAULT_CONTRAST_AMOUNT: f64 = 1.5;
pub const DEFAULT_VHS_STRENGTH: i32 = 3;
pub const DEFAULT_PIXELATE_SIZE: u32 = 10;

impl EffectSpec {
    /// The effect with every parameter at its default.
    pub fn with_defaults(kind: EffectKind) -> Self {
        match kind {
            EffectKind::Invert => Self::Invert,
            EffectKind::Grayscale => Self::Grayscale,
            EffectKind::Sepia => Self::Sepia,
            EffectKind::Solarize => Self::Solarize,
            EffectKind::Posterize => Self::Posterize {
                levels: DEFAULT_POSTERIZE_LEVELS,
            },
            EffectKind::Brightness => Self::Brightness {
                amount: DEFAULT_BRIGHTNESS_AMOUNT,
            },
            EffectKind::Contrast => Self::Contrast {
                amount: DEFAULT_CONTRAST_AMOUNT,
            },
            EffectKind::Blur => Self::Blur,
            EffectKind::Sharpen => Self::Sharpen,
            EffectKind::Edge => Self::Edge,
            EffectKind::Emboss => Self::Emboss,
            EffectKind::Neon => Self::Neon,
            EffectKind::Scanlines => Self::Scanlines,
            EffectKind::Vhs => Self::Vhs {
                strength: DEFAULT_VHS_STRENGTH,
            },
            EffectKind::Noise => Self::Noise,
            EffectKind::Pixelate => Self::Pixelate {
                size: DEFAULT_PIXELATE_SIZE,
            },
            EffectKind::Stretch => Self::Stretch,
            EffectKind::Swirl => Self::Swirl,
            EffectKind::Heatwave => Self::Heatwave,
            EffectKind::Ghost => Self::Ghost,
            EffectKind::Outline => Self::Outline,
            EffectKind::Glow => Self::Glow,
            EffectKind::Warp => Self::Warp,
            EffectKind::Rotate => Self::Rotate { angle: 0.0 },
            EffectKind::SpinCube => Self::SpinCube { angle: 0.0 },
        }
    }

    pub fn kind(&self) -> EffectKind {
        match self {
            Self::Invert => EffectKind::Invert,
            Self::Grayscale => EffectKind::Grayscale,
            Self::Sepia => EffectKind::Sepia,
            Self::Solarize => EffectKind::Solarize,
            Self::Posterize { .. } => EffectKind::Posterize,
            Self::Brightness { .. } => EffectKind::Brightness,
            Self::Contrast { .. } => EffectKind::Contrast,
            Self::Blur => EffectKind::Blur,
            Self::Sharpen => EffectKind::Sharpen,
            Self::Edge => EffectKind::Edge,
            Self::Emboss => EffectKind::Emboss,
            Self::Neon => EffectKind::Neon,
            Self::Scanlines => EffectKind::Scanlines,
            Self::Vhs { .. } => EffectKind::Vhs,
            Self::Noise => EffectKind::Noise,
            Self::Pixelate { .. } => EffectKind::Pixelate,
            Self::Stretch => EffectKind::Stretch,
            Self::Swirl => EffectKind::Swirl,
            Self::Heatwave => EffectKind::Heatwave,
            Self::Ghost => EffectKind::Ghost,
            Self::Outline => EffectKind::Outline,
            Self::Glow => EffectKind::Glow,
            Self::Warp => EffectKind::Warp,
            Self::Rotate { .. } => EffectKind::Rotate,
            Self::SpinCube { .. } => EffectKind::SpinCube,
        }
    }
}

/// Parse one wire effect object.
///
/// The name comes from `type` (or `kind`). Missing parameters take their defaults; present but
/// malformed ones are validation errors. Names outside [`EffectKind::ALL`] yield
/// [`RasterFxError::UnsupportedEffect`].
pub fn parse_effect(obj: &serde_json::Value) -> RasterFxResult<EffectSpec> {
    if !obj.is_object() {
        return Err(RasterFxError::validation("effect must be a JSON object"));
    }
    let Some(name) = obj.get("type").or_else(|| obj.get("kind")) else {
        return Err(RasterFxError::validation("effect is missing 'type'"));
    };
    let Some(name) = name.as_str() else {
        return Err(RasterFxError::validation("effect 'type' must be a string"));
    };
    if name.trim().is_empty() {
        return Err(RasterFxError::validation("effect 'type' must be non-empty"));
    }
    let kind: EffectKind = name.parse()?;

    let spec = match kind {
        EffectKind::Posterize => {
            let levels = opt_u32(obj, "levels", DEFAULT_POSTERIZE_LEVELS)?;
            if !(1..=256).contains(&levels) {
                return Err(RasterFxError::validation(
                    "posterize.levels must be in 1..=256",
                ));
            }
            EffectSpec::Posterize { levels }
        }
        EffectKind::Brightness => EffectSpec::Brightness {
            amount: opt_i32(obj, "amount", DEFAULT_BRIGHTNESS_AMOUNT)?,
        },
        EffectKind::Contrast => EffectSpec::Contrast {
            amount: opt_f64(obj, "amount", DEFAULT_CONTRAST_AMOUNT)?,
        },
        EffectKind::Vhs => EffectSpec::Vhs {
            strength: opt_i32(obj, "strength", DEFAULT_VHS_STRENGTH)?,
        },
        EffectKind::Pixelate => {
            let size = opt_u32(obj, "size", DEFAULT_PIXELATE_SIZE)?;
            if size == 0 {
                return Err(RasterFxError::validation("pixelate.size must be >= 1"));
            }
            EffectSpec::Pixelate { size }
        }
        EffectKind::Rotate => EffectSpec::Rotate {
            angle: parse_angle(obj)?,
        },
        EffectKind::SpinCube => EffectSpec::SpinCube {
            angle: parse_angle(obj)?,
        },
        other => EffectSpec::with_defaults(other),
    };
    Ok(spec)
}

/// `angle` (radians) wins over `angle_deg`; neither means no rotation.
fn parse_angle(obj: &serde_json::Value) -> RasterFxResult<f64> {
    match (obj.get("angle"), obj.get("angle_deg")) {
        (Some(_), _) => opt_f64(obj, "angle", 0.0),
        (None, Some(_)) => Ok(opt_f64(obj, "angle_deg", 0.0)?.to_radians()),
        (None, None) => Ok(0.0),
    }
}

fn opt_f64(obj: &serde_json::Value, key: &str, default: f64) -> RasterFxResult<f64> {
    let Some(v) = obj.get(key) else {
        return Ok(default);
    };
    let Some(n) = v.as_f64() else {
        return Err(RasterFxError::validation(format!(
            "effect param '{key}' must be a number"
        )));
    };
    if !n.is_finite() {
        return Err(RasterFxError::validation(format!(
            "effect param '{key}' must be finite"
        )));
    }
    Ok(n)
}

/// Integer parameter; fractional numbers are truncated toward zero.
fn opt_i64(obj: &serde_json::Value, key: &str) -> RasterFxResult<Option<i64>> {
    let Some(v) = obj.get(key) else {
        return Ok(None);
    };
    if let Some(n) = v.as_i64() {
        return Ok(Some(n));
    }
    match v.as_f64() {
        Some(f) if f.is_finite() => Ok(Some(f.trunc() as i64)),
        _ => Err(RasterFxError::validation(format!(
            "effect param '{key}' must be an integer"
        ))),
    }
}

fn opt_i32(obj: &serde_json::Value, key: &str, default: i32) -> RasterFxResult<i32> {
    match opt_i64(obj, key)? {
        None => Ok(default),
        Some(n) => i32::try_from(n).map_err(|_| {
            RasterFxError::validation(format!("effect param '{key}' is out of range"))
        }),
    }
}

fn opt_u32(obj: &serde_json::Value, key: &str, default: u32) -> RasterFxResult<u32> {
    match opt_i64(obj, key)? {
        None => Ok(default),
        Some(n) => u32::try_from(n).map_err(|_| {
            RasterFxError::validation(format!("effect param '{key}' is out of range"))
        }),
    }
}

#[cfg(test)]
#[path = "../tests/unit/model.rs"]
mod tests;
